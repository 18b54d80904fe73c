use log::info;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::controllers::{bus_index, route_index};
use crate::dto::common::{ApiResponse, BusSummary, RouteSummary};
use crate::dto::station_dto::{
    CreateStationRequest, StationQuery, StationResponse, UpdateStationRequest,
};
use crate::models::{Bus, NewStation, Route, StationFilter};
use crate::repositories::{BusRepository, Repositories, RouteRepository, StationRepository};
use crate::utils::errors::{not_found_error, validation_error, AppError};
use crate::utils::validation::{parse_id, parse_optional_id};

pub struct StationController {
    stations: Arc<dyn StationRepository>,
    routes: Arc<dyn RouteRepository>,
    buses: Arc<dyn BusRepository>,
}

/// Campos comunes de alta y edición
struct StationFields<'a> {
    route: &'a str,
    bus: Option<&'a str>,
    name: &'a str,
    latitude: Option<f64>,
    longitude: Option<f64>,
    fare: Option<rust_decimal::Decimal>,
}

impl StationController {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            stations: repos.stations.clone(),
            routes: repos.routes.clone(),
            buses: repos.buses.clone(),
        }
    }

    pub async fn list(&self, query: StationQuery) -> Result<Vec<StationResponse>, AppError> {
        let filter = StationFilter {
            route_id: parse_optional_id("routeId", query.route_id.as_deref())?,
            bus_id: parse_optional_id("busId", query.bus_id.as_deref())?,
        };
        let stations = self.stations.find_all(filter).await?;

        let routes = route_index(self.routes.as_ref(), stations.iter().map(|s| s.route_id)).await?;
        let buses = bus_index(self.buses.as_ref(), stations.iter().filter_map(|s| s.bus_id)).await?;

        Ok(stations
            .into_iter()
            .map(|station| {
                let route = routes.get(&station.route_id).map(RouteSummary::from);
                let bus = station
                    .bus_id
                    .and_then(|id| buses.get(&id))
                    .map(BusSummary::from);
                StationResponse::new(station, route, bus)
            })
            .collect())
    }

    pub async fn create(
        &self,
        request: CreateStationRequest,
    ) -> Result<ApiResponse<StationResponse>, AppError> {
        request.validate()?;
        let (new, route, bus) = self
            .resolve(StationFields {
                route: &request.route,
                bus: request.bus.as_deref(),
                name: &request.name,
                latitude: request.latitude,
                longitude: request.longitude,
                fare: request.fare,
            })
            .await?;

        let station = self.stations.create(new).await?;
        info!("📍 Estación '{}' creada en la ruta {}", station.name, route.label());

        Ok(ApiResponse::success_with_message(
            StationResponse::new(
                station,
                Some(RouteSummary::from(&route)),
                bus.as_ref().map(BusSummary::from),
            ),
            "Station created successfully",
        ))
    }

    pub async fn update(
        &self,
        request: UpdateStationRequest,
    ) -> Result<ApiResponse<StationResponse>, AppError> {
        request.validate()?;
        let id = parse_id("station id", &request.id)?;
        let (new, route, bus) = self
            .resolve(StationFields {
                route: &request.route,
                bus: request.bus.as_deref(),
                name: &request.name,
                latitude: request.latitude,
                longitude: request.longitude,
                fare: request.fare,
            })
            .await?;

        let station = self
            .stations
            .update(id, new)
            .await?
            .ok_or_else(|| not_found_error("Station", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(
            StationResponse::new(
                station,
                Some(RouteSummary::from(&route)),
                bus.as_ref().map(BusSummary::from),
            ),
            "Station updated successfully",
        ))
    }

    pub async fn delete(&self, id: Option<&str>) -> Result<(), AppError> {
        let id = parse_id("station id", id.unwrap_or_default())?;
        if !self.stations.delete(id).await? {
            return Err(not_found_error("Station", &id.to_string()));
        }
        info!("🗑️ Estación {} eliminada", id);
        Ok(())
    }

    /// Verificar ruta y bus, y que el bus circule por esa ruta
    async fn resolve(
        &self,
        fields: StationFields<'_>,
    ) -> Result<(NewStation, Route, Option<Bus>), AppError> {
        let route_id: Uuid = parse_id("route", fields.route)?;
        let route = self
            .routes
            .find_by_id(route_id)
            .await?
            .ok_or_else(|| not_found_error("Route", &route_id.to_string()))?;

        let bus = match parse_optional_id("bus", fields.bus)? {
            Some(bus_id) => {
                let bus = self
                    .buses
                    .find_by_id(bus_id)
                    .await?
                    .ok_or_else(|| not_found_error("Bus", &bus_id.to_string()))?;
                if bus.route_id != route.id {
                    return Err(validation_error("bus", "Bus does not run on the selected route"));
                }
                Some(bus)
            }
            None => None,
        };

        let new = NewStation {
            route_id: route.id,
            bus_id: bus.as_ref().map(|b| b.id),
            name: fields.name.trim().to_string(),
            latitude: fields.latitude.unwrap_or_default(),
            longitude: fields.longitude.unwrap_or_default(),
            fare: fields.fare.unwrap_or_default(),
        };
        Ok((new, route, bus))
    }
}
