//! Modelo de Ticket
//!
//! Ticket de un solo viaje. Origen/destino y precio se copian de la estación
//! y su ruta al emitirlo; la validez es de 24 horas exactas.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const TICKET_VALIDITY_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Uuid,
    pub user_id: String,
    pub route_id: Uuid,
    pub bus_id: Uuid,
    pub start_station: String,
    pub end_station: String,
    pub price: Decimal,
    pub payment_intent_id: String,
    pub expiry_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTicket {
    pub user_id: String,
    pub route_id: Uuid,
    pub bus_id: Uuid,
    pub start_station: String,
    pub end_station: String,
    pub price: Decimal,
    pub payment_intent_id: String,
    pub expiry_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    pub fn expiry_for(created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + Duration::hours(TICKET_VALIDITY_HOURS)
    }

    pub fn from_new(id: Uuid, new: NewTicket) -> Self {
        Self {
            id,
            user_id: new.user_id,
            route_id: new.route_id,
            bus_id: new.bus_id,
            start_station: new.start_station,
            end_station: new.end_station,
            price: new.price,
            payment_intent_id: new.payment_intent_id,
            expiry_date: new.expiry_date,
            created_at: new.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ticket_valid_for_exactly_24_hours() {
        let created = Utc.with_ymd_and_hms(2024, 2, 28, 22, 15, 7).unwrap();
        let expiry = Ticket::expiry_for(created);
        assert_eq!(expiry, Utc.with_ymd_and_hms(2024, 2, 29, 22, 15, 7).unwrap());
        assert_eq!((expiry - created).num_seconds(), 24 * 3600);
    }
}
