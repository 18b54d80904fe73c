use log::info;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::controllers::route_index;
use crate::dto::bus_dto::{BusResponse, CreateBusRequest, UpdateBusRequest};
use crate::dto::common::{ApiResponse, RouteSummary};
use crate::models::{NewBus, Route};
use crate::repositories::{BusRepository, Repositories, RouteRepository};
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::{parse_id, parse_optional_id};

pub struct BusController {
    buses: Arc<dyn BusRepository>,
    routes: Arc<dyn RouteRepository>,
}

impl BusController {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            buses: repos.buses.clone(),
            routes: repos.routes.clone(),
        }
    }

    pub async fn list(&self, route_id: Option<&str>) -> Result<Vec<BusResponse>, AppError> {
        let route_id = parse_optional_id("routeId", route_id)?;
        let buses = self.buses.find_all(route_id).await?;
        let routes = route_index(self.routes.as_ref(), buses.iter().map(|b| b.route_id)).await?;

        Ok(buses
            .into_iter()
            .map(|bus| {
                let route = routes.get(&bus.route_id).map(RouteSummary::from);
                BusResponse::new(bus, route)
            })
            .collect())
    }

    pub async fn create(&self, request: CreateBusRequest) -> Result<ApiResponse<BusResponse>, AppError> {
        request.validate()?;
        let route = self.existing_route(&request.route).await?;

        let bus = self
            .buses
            .create(NewBus {
                name: request.name.trim().to_string(),
                route_id: route.id,
                capacity: request.capacity.unwrap_or_default(),
            })
            .await?;
        info!("🚌 Bus '{}' creado en la ruta {}", bus.name, route.label());

        Ok(ApiResponse::success_with_message(
            BusResponse::new(bus, Some(RouteSummary::from(&route))),
            "Bus created successfully",
        ))
    }

    pub async fn update(&self, request: UpdateBusRequest) -> Result<ApiResponse<BusResponse>, AppError> {
        request.validate()?;
        let id = parse_id("bus id", &request.id)?;
        let route = self.existing_route(&request.route).await?;

        let bus = self
            .buses
            .update(
                id,
                NewBus {
                    name: request.name.trim().to_string(),
                    route_id: route.id,
                    capacity: request.capacity.unwrap_or_default(),
                },
            )
            .await?
            .ok_or_else(|| not_found_error("Bus", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(
            BusResponse::new(bus, Some(RouteSummary::from(&route))),
            "Bus updated successfully",
        ))
    }

    pub async fn delete(&self, id: Option<&str>) -> Result<(), AppError> {
        let id = parse_id("bus id", id.unwrap_or_default())?;

        if self.buses.is_referenced(id).await? {
            return Err(AppError::Conflict(
                "Bus is referenced by tickets and cannot be deleted".to_string(),
            ));
        }
        if !self.buses.delete(id).await? {
            return Err(not_found_error("Bus", &id.to_string()));
        }

        info!("🗑️ Bus {} eliminado", id);
        Ok(())
    }

    async fn existing_route(&self, raw_id: &str) -> Result<Route, AppError> {
        let route_id: Uuid = parse_id("route", raw_id)?;
        self.routes
            .find_by_id(route_id)
            .await?
            .ok_or_else(|| not_found_error("Route", &route_id.to_string()))
    }
}
