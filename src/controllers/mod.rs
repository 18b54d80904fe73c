//! Controllers
//!
//! Lógica de cada operación de la API. Las referencias entre entidades se
//! resuelven aquí con búsquedas explícitas por id.

pub mod bus_controller;
pub mod expiry_controller;
pub mod pass_controller;
pub mod pass_usage_controller;
pub mod payment_controller;
pub mod route_controller;
pub mod station_controller;
pub mod ticket_controller;

use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{Bus, Route};
use crate::repositories::{BusRepository, RouteRepository};
use crate::utils::errors::AppResult;

/// Cargar las rutas referenciadas indexadas por id
pub(crate) async fn route_index(
    routes: &dyn RouteRepository,
    ids: impl IntoIterator<Item = Uuid>,
) -> AppResult<HashMap<Uuid, Route>> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(routes
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|route| (route.id, route))
        .collect())
}

/// Cargar los buses referenciados indexados por id
pub(crate) async fn bus_index(
    buses: &dyn BusRepository,
    ids: impl IntoIterator<Item = Uuid>,
) -> AppResult<HashMap<Uuid, Bus>> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(buses
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|bus| (bus.id, bus))
        .collect())
}
