//! Modelo de Route
//!
//! Datos de referencia: origen, destino y tarifa.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Route principal - mapea a la tabla routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: Uuid,
    #[sqlx(rename = "start_location")]
    pub start: String,
    #[sqlx(rename = "end_location")]
    pub end: String,
    pub fare: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Datos para insertar o reemplazar una ruta
#[derive(Debug, Clone)]
pub struct NewRoute {
    pub start: String,
    pub end: String,
    pub fare: Decimal,
}

impl Route {
    pub fn from_new(id: Uuid, new: NewRoute, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            start: new.start,
            end: new.end,
            fare: new.fare,
            created_at,
        }
    }

    /// Etiqueta legible "origen → destino"
    pub fn label(&self) -> String {
        format!("{} → {}", self.start, self.end)
    }
}
