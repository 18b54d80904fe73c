//! Modelo de Bus

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Bus asignado a una ruta - mapea a la tabla buses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    pub id: Uuid,
    pub name: String,
    pub route_id: Uuid,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBus {
    pub name: String,
    pub route_id: Uuid,
    pub capacity: i32,
}

impl Bus {
    pub fn from_new(id: Uuid, new: NewBus, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            route_id: new.route_id,
            capacity: new.capacity,
            created_at,
        }
    }
}
