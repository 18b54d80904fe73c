use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::{BusSummary, RouteSummary};
use crate::models::Ticket;
use crate::utils::validation::validate_not_blank;

// Request para emitir un ticket tras el pago
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub session_id: String,

    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub user_id: String,

    #[serde(default)]
    pub station_id: String,

    #[serde(default)]
    pub bus_id: String,
}

// Response de ticket con ruta y bus resueltos
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub id: Uuid,
    pub user_id: String,
    pub route_id: Uuid,
    pub bus_id: Uuid,
    pub route: Option<RouteSummary>,
    pub bus: Option<BusSummary>,
    pub start_station: String,
    pub end_station: String,
    pub price: Decimal,
    pub payment_intent_id: String,
    pub expiry_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TicketResponse {
    pub fn new(ticket: Ticket, route: Option<RouteSummary>, bus: Option<BusSummary>) -> Self {
        Self {
            id: ticket.id,
            user_id: ticket.user_id,
            route_id: ticket.route_id,
            bus_id: ticket.bus_id,
            route,
            bus,
            start_station: ticket.start_station,
            end_station: ticket.end_station,
            price: ticket.price,
            payment_intent_id: ticket.payment_intent_id,
            expiry_date: ticket.expiry_date,
            created_at: ticket.created_at,
        }
    }
}
