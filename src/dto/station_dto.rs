use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::{BusSummary, RouteSummary};
use crate::models::Station;
use crate::utils::validation::{validate_fare, validate_not_blank};

// Request para crear una estación
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStationRequest {
    #[serde(default, alias = "routeId")]
    pub route: String,

    #[serde(default, alias = "busId")]
    pub bus: Option<String>,

    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub name: String,

    #[validate(required, range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(required, range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    #[validate(required, custom = "validate_fare")]
    pub fare: Option<Decimal>,
}

// Request para actualizar una estación
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStationRequest {
    #[serde(default)]
    pub id: String,

    #[serde(default, alias = "routeId")]
    pub route: String,

    #[serde(default, alias = "busId")]
    pub bus: Option<String>,

    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub name: String,

    #[validate(required, range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(required, range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    #[validate(required, custom = "validate_fare")]
    pub fare: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationQuery {
    pub route_id: Option<String>,
    pub bus_id: Option<String>,
}

// Response de estación con ruta y bus resueltos
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationResponse {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub fare: Decimal,
    pub route_id: Uuid,
    pub bus_id: Option<Uuid>,
    pub route: Option<RouteSummary>,
    pub bus: Option<BusSummary>,
    pub created_at: DateTime<Utc>,
}

impl StationResponse {
    pub fn new(station: Station, route: Option<RouteSummary>, bus: Option<BusSummary>) -> Self {
        Self {
            id: station.id,
            name: station.name,
            latitude: station.latitude,
            longitude: station.longitude,
            fare: station.fare,
            route_id: station.route_id,
            bus_id: station.bus_id,
            route,
            bus,
            created_at: station.created_at,
        }
    }
}
