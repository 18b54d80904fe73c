use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::RouteSummary;
use crate::models::Bus;
use crate::utils::validation::validate_not_blank;

// Request para crear un bus
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBusRequest {
    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub name: String,

    #[serde(default, alias = "routeId")]
    pub route: String,

    #[validate(required, range(min = 1))]
    pub capacity: Option<i32>,
}

// Request para actualizar un bus
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBusRequest {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub name: String,

    #[serde(default, alias = "routeId")]
    pub route: String,

    #[validate(required, range(min = 1))]
    pub capacity: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusQuery {
    pub route_id: Option<String>,
}

// Response de bus con la ruta resuelta
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusResponse {
    pub id: Uuid,
    pub name: String,
    pub capacity: i32,
    pub route_id: Uuid,
    pub route: Option<RouteSummary>,
    pub created_at: DateTime<Utc>,
}

impl BusResponse {
    pub fn new(bus: Bus, route: Option<RouteSummary>) -> Self {
        Self {
            id: bus.id,
            name: bus.name,
            capacity: bus.capacity,
            route_id: bus.route_id,
            route,
            created_at: bus.created_at,
        }
    }
}
