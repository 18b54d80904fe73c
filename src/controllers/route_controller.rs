use log::{info, warn};
use std::sync::Arc;

use crate::dto::common::ApiResponse;
use crate::dto::route_dto::{CreateRouteRequest, UpdateRouteRequest};
use crate::models::Route;
use crate::repositories::{Repositories, RouteRepository};
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::parse_id;
use validator::Validate;

pub struct RouteController {
    routes: Arc<dyn RouteRepository>,
}

impl RouteController {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            routes: repos.routes.clone(),
        }
    }

    pub async fn list(&self) -> Result<Vec<Route>, AppError> {
        self.routes.find_all().await
    }

    pub async fn create(&self, request: CreateRouteRequest) -> Result<ApiResponse<Route>, AppError> {
        request.validate()?;

        let route = self.routes.create(request.into_new_route()).await?;
        info!("🛣️ Ruta creada: {} ({})", route.label(), route.id);

        Ok(ApiResponse::success_with_message(route, "Route created successfully"))
    }

    pub async fn update(&self, request: UpdateRouteRequest) -> Result<ApiResponse<Route>, AppError> {
        request.validate()?;
        let id = parse_id("route id", &request.id)?;

        // Pases y tickets guardan una copia de la ruta; no se puede cambiar bajo ellos
        if self.routes.is_referenced(id).await? {
            warn!("⚠️ Ruta {} referenciada, no se actualiza", id);
            return Err(AppError::Conflict(
                "Route is referenced by passes or tickets and cannot be modified".to_string(),
            ));
        }

        let route = self
            .routes
            .update(id, request.into_new_route())
            .await?
            .ok_or_else(|| not_found_error("Route", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(route, "Route updated successfully"))
    }

    pub async fn delete(&self, id: Option<&str>) -> Result<(), AppError> {
        let id = parse_id("route id", id.unwrap_or_default())?;

        if self.routes.is_referenced(id).await? {
            warn!("⚠️ Ruta {} referenciada, no se elimina", id);
            return Err(AppError::Conflict(
                "Route is referenced by passes or tickets and cannot be deleted".to_string(),
            ));
        }

        if !self.routes.delete(id).await? {
            return Err(not_found_error("Route", &id.to_string()));
        }

        info!("🗑️ Ruta {} eliminada junto con sus buses y estaciones", id);
        Ok(())
    }
}
