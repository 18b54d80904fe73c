//! Modelo de Station
//!
//! Una estación pertenece a una ruta y, opcionalmente, a un bus concreto.
//! Su tarifa es la que se cobra por un ticket emitido en ella.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: Uuid,
    pub route_id: Uuid,
    pub bus_id: Option<Uuid>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub fare: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStation {
    pub route_id: Uuid,
    pub bus_id: Option<Uuid>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub fare: Decimal,
}

/// Filtros de listado (`?routeId=&busId=`)
#[derive(Debug, Clone, Copy, Default)]
pub struct StationFilter {
    pub route_id: Option<Uuid>,
    pub bus_id: Option<Uuid>,
}

impl StationFilter {
    pub fn matches(&self, station: &Station) -> bool {
        self.route_id.map_or(true, |id| station.route_id == id)
            && self.bus_id.map_or(true, |id| station.bus_id == Some(id))
    }
}

impl Station {
    pub fn from_new(id: Uuid, new: NewStation, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            route_id: new.route_id,
            bus_id: new.bus_id,
            name: new.name,
            latitude: new.latitude,
            longitude: new.longitude,
            fare: new.fare,
            created_at,
        }
    }
}
