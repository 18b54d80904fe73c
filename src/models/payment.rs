//! Modelo de PaymentRecord
//!
//! Registro del lado servidor de una sesión de checkout. Se crea `pending`
//! al iniciar el pago y pasa a `completed` cuando se emite el pase o ticket.
//! Es la fuente de verdad de usuario, ruta y tarifa al confirmar.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Pass,
    Ticket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
}

#[derive(Debug, Error)]
#[error("unknown {kind} value '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Pass => "pass",
            PaymentKind::Ticket => "ticket",
        }
    }
}

impl FromStr for PaymentKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pass" => Ok(PaymentKind::Pass),
            "ticket" => Ok(PaymentKind::Ticket),
            other => Err(ParseEnumError {
                kind: "payment type",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            other => Err(ParseEnumError {
                kind: "payment status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: Uuid,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    pub route_id: Uuid,
    pub station_id: Option<Uuid>,
    pub bus_id: Option<Uuid>,
    pub fare: Decimal,
    pub external_session_id: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPaymentRecord {
    pub user_id: String,
    pub kind: PaymentKind,
    pub route_id: Uuid,
    pub station_id: Option<Uuid>,
    pub bus_id: Option<Uuid>,
    pub fare: Decimal,
    pub external_session_id: String,
}

impl PaymentRecord {
    pub fn from_new(id: Uuid, new: NewPaymentRecord, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: new.user_id,
            kind: new.kind,
            route_id: new.route_id,
            station_id: new.station_id,
            bus_id: new.bus_id,
            fare: new.fare,
            external_session_id: new.external_session_id,
            status: PaymentStatus::Pending,
            created_at,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }
}

impl<'r> FromRow<'r, PgRow> for PaymentRecord {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let kind: String = row.try_get("payment_type")?;
        let status: String = row.try_get("status")?;

        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            kind: kind.parse().map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            route_id: row.try_get("route_id")?,
            station_id: row.try_get("station_id")?,
            bus_id: row.try_get("bus_id")?,
            fare: row.try_get("fare")?,
            external_session_id: row.try_get("external_session_id")?,
            status: status.parse().map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            created_at: row.try_get("created_at")?,
        })
    }
}
