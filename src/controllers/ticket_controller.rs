use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;
use validator::Validate;

use crate::controllers::payment_controller::{ensure_bus_serves_station, pending_record, verify_paid};
use crate::controllers::{bus_index, route_index};
use crate::dto::common::{ApiResponse, BusSummary, RouteSummary};
use crate::dto::ticket_dto::{CreateTicketRequest, TicketResponse};
use crate::models::{NewTicket, PaymentKind, Ticket};
use crate::repositories::{
    BusRepository, PaymentRepository, Repositories, RouteRepository, StationRepository,
    TicketRepository,
};
use crate::services::PaymentGateway;
use crate::utils::errors::{not_found_error, validation_error, AppError};
use crate::utils::validation::{parse_id, require_user_id};

pub struct TicketController {
    tickets: Arc<dyn TicketRepository>,
    stations: Arc<dyn StationRepository>,
    routes: Arc<dyn RouteRepository>,
    buses: Arc<dyn BusRepository>,
    payments: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
}

impl TicketController {
    pub fn new(repos: &Repositories, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            tickets: repos.tickets.clone(),
            stations: repos.stations.clone(),
            routes: repos.routes.clone(),
            buses: repos.buses.clone(),
            payments: repos.payments.clone(),
            gateway,
        }
    }

    /// Emitir un ticket de un viaje tras confirmar el pago.
    ///
    /// Todas las referencias se resuelven antes de escribir: si algo falla
    /// no queda ningún ticket persistido.
    pub async fn create_ticket(
        &self,
        request: CreateTicketRequest,
    ) -> Result<ApiResponse<TicketResponse>, AppError> {
        request.validate()?;
        let user_id = request.user_id.trim().to_string();
        let station_id = parse_id("stationId", &request.station_id)?;
        let bus_id = parse_id("busId", &request.bus_id)?;

        let session = verify_paid(self.gateway.as_ref(), &request.session_id).await?;
        let record = pending_record(
            self.payments.as_ref(),
            &request.session_id,
            PaymentKind::Ticket,
            &user_id,
        )
        .await?;
        if let Some(record) = &record {
            if record.station_id.is_some_and(|id| id != station_id) {
                return Err(validation_error("stationId", "Station does not match the payment session"));
            }
            if record.bus_id.is_some_and(|id| id != bus_id) {
                return Err(validation_error("busId", "Bus does not match the payment session"));
            }
        }

        let station = self
            .stations
            .find_by_id(station_id)
            .await?
            .ok_or_else(|| not_found_error("Station", &station_id.to_string()))?;
        let route = self
            .routes
            .find_by_id(station.route_id)
            .await?
            .ok_or_else(|| not_found_error("Route", &station.route_id.to_string()))?;
        let bus = self
            .buses
            .find_by_id(bus_id)
            .await?
            .ok_or_else(|| not_found_error("Bus", &bus_id.to_string()))?;

        ensure_bus_serves_station(&bus, &station)?;

        // Un mismo pago no puede emitir dos tickets
        let payment_intent_id = session.payment_intent.unwrap_or(session.id);
        if let Some(existing) = self.tickets.find_by_payment_intent(&payment_intent_id).await? {
            warn!(
                "⚠️ El pago {} ya emitió el ticket {}",
                payment_intent_id, existing.id
            );
            return Err(AppError::Conflict(
                "Payment session has already been used".to_string(),
            ));
        }

        let created_at = Utc::now();
        let ticket = self
            .tickets
            .create(NewTicket {
                user_id,
                route_id: route.id,
                bus_id: bus.id,
                start_station: route.start.clone(),
                end_station: route.end.clone(),
                price: record.as_ref().map_or(station.fare, |r| r.fare),
                payment_intent_id,
                expiry_date: Ticket::expiry_for(created_at),
                created_at,
            })
            .await?;

        if let Some(record) = &record {
            if !self.payments.mark_completed(&record.external_session_id).await? {
                warn!(
                    "⚠️ La sesión {} ya estaba completada al emitir el ticket {}",
                    record.external_session_id, ticket.id
                );
            }
        }

        info!(
            "🎟️ Ticket {} emitido para {} en '{}' ({} {})",
            ticket.id, ticket.user_id, station.name, bus.name, route.label()
        );

        Ok(ApiResponse::success_with_message(
            TicketResponse::new(
                ticket,
                Some(RouteSummary::from(&route)),
                Some(BusSummary::from(&bus)),
            ),
            "Ticket created successfully",
        ))
    }

    /// Tickets del usuario, más recientes primero
    pub async fn list_tickets(&self, user_id: Option<&str>) -> Result<Vec<TicketResponse>, AppError> {
        let user_id = require_user_id(user_id)?;
        let tickets = self.tickets.find_by_user(&user_id).await?;

        let routes = route_index(self.routes.as_ref(), tickets.iter().map(|t| t.route_id)).await?;
        let buses = bus_index(self.buses.as_ref(), tickets.iter().map(|t| t.bus_id)).await?;

        Ok(tickets
            .into_iter()
            .map(|ticket| {
                let route = routes.get(&ticket.route_id).map(RouteSummary::from);
                let bus = buses.get(&ticket.bus_id).map(BusSummary::from);
                TicketResponse::new(ticket, route, bus)
            })
            .collect())
    }
}
