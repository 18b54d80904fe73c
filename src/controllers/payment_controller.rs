//! Apertura de sesiones de checkout
//!
//! El importe siempre sale de la ruta o estación guardada en el servidor.
//! Cada sesión deja un `PaymentRecord` pendiente que luego consulta la
//! confirmación del pase o del ticket.

use log::{info, warn};
use std::sync::Arc;
use validator::Validate;

use crate::config::EnvironmentConfig;
use crate::dto::payment_dto::{CreatePaymentSessionRequest, PaymentSessionResponse};
use crate::models::{Bus, NewPaymentRecord, PaymentKind, PaymentRecord, Station};
use crate::repositories::{
    BusRepository, PaymentRepository, Repositories, RouteRepository, StationRepository,
};
use crate::services::{CheckoutRequest, PaymentGateway, SessionStatus};
use crate::utils::errors::{not_found_error, validation_error, AppError, AppResult};
use crate::utils::validation::{parse_id, parse_optional_id};

pub struct PaymentController {
    routes: Arc<dyn RouteRepository>,
    stations: Arc<dyn StationRepository>,
    buses: Arc<dyn BusRepository>,
    payments: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
    config: Arc<EnvironmentConfig>,
}

impl PaymentController {
    pub fn new(
        repos: &Repositories,
        gateway: Arc<dyn PaymentGateway>,
        config: Arc<EnvironmentConfig>,
    ) -> Self {
        Self {
            routes: repos.routes.clone(),
            stations: repos.stations.clone(),
            buses: repos.buses.clone(),
            payments: repos.payments.clone(),
            gateway,
            config,
        }
    }

    pub async fn create_payment_session(
        &self,
        request: CreatePaymentSessionRequest,
    ) -> Result<PaymentSessionResponse, AppError> {
        request.validate()?;
        let user_id = request.user_id.trim().to_string();

        let (checkout, record) = match request.kind {
            Some(PaymentKind::Pass) => self.pass_checkout(&user_id, &request).await?,
            Some(PaymentKind::Ticket) => self.ticket_checkout(&user_id, &request).await?,
            None => return Err(validation_error("type", "Payment type is required")),
        };

        let session = self.gateway.create_checkout_session(checkout).await?;
        let record = self
            .payments
            .create(NewPaymentRecord {
                external_session_id: session.id.clone(),
                ..record
            })
            .await?;

        info!(
            "💳 Sesión de pago {} creada ({} de {} para {})",
            session.id, record.kind, record.fare, record.user_id
        );

        Ok(PaymentSessionResponse {
            session_id: session.id,
            redirect_url: session.url,
        })
    }

    async fn pass_checkout(
        &self,
        user_id: &str,
        request: &CreatePaymentSessionRequest,
    ) -> AppResult<(CheckoutRequest, NewPaymentRecord)> {
        let route_id = parse_id("routeId", request.route_id.as_deref().unwrap_or_default())?;
        let route = self
            .routes
            .find_by_id(route_id)
            .await?
            .ok_or_else(|| not_found_error("Route", &route_id.to_string()))?;

        if request.fare.is_some_and(|fare| fare != route.fare) {
            return Err(validation_error("fare", "Fare does not match the route fare"));
        }

        let (success_url, cancel_url) = self.config.pass_checkout_urls();
        let checkout = CheckoutRequest {
            amount: route.fare,
            description: format!("Monthly Travel Pass for Route {}", route.label()),
            success_url,
            cancel_url,
            customer_email: None,
            metadata: vec![
                ("type".to_string(), PaymentKind::Pass.to_string()),
                ("userId".to_string(), user_id.to_string()),
                ("routeId".to_string(), route.id.to_string()),
            ],
        };
        let record = NewPaymentRecord {
            user_id: user_id.to_string(),
            kind: PaymentKind::Pass,
            route_id: route.id,
            station_id: None,
            bus_id: None,
            fare: route.fare,
            external_session_id: String::new(),
        };
        Ok((checkout, record))
    }

    async fn ticket_checkout(
        &self,
        user_id: &str,
        request: &CreatePaymentSessionRequest,
    ) -> AppResult<(CheckoutRequest, NewPaymentRecord)> {
        let station_id = parse_id("stationId", request.station_id.as_deref().unwrap_or_default())?;
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

        let bus_id = match parse_optional_id("busId", request.bus_id.as_deref())? {
            Some(bus_id) => {
                let bus = self
                    .buses
                    .find_by_id(bus_id)
                    .await?
                    .ok_or_else(|| not_found_error("Bus", &bus_id.to_string()))?;
                ensure_bus_serves_station(&bus, &station)?;
                Some(bus.id)
            }
            None => station.bus_id,
        };

        if request.fare.is_some_and(|fare| fare != station.fare) {
            return Err(validation_error("fare", "Fare does not match the station fare"));
        }

        let (success_url, cancel_url) = self.config.ticket_checkout_urls();
        let mut metadata = vec![
            ("type".to_string(), PaymentKind::Ticket.to_string()),
            ("userId".to_string(), user_id.to_string()),
            ("stationId".to_string(), station.id.to_string()),
        ];
        if let Some(bus_id) = bus_id {
            metadata.push(("busId".to_string(), bus_id.to_string()));
        }

        let checkout = CheckoutRequest {
            amount: station.fare,
            description: format!("{} Ticket", station.name),
            success_url,
            cancel_url,
            customer_email: None,
            metadata,
        };
        let record = NewPaymentRecord {
            user_id: user_id.to_string(),
            kind: PaymentKind::Ticket,
            route_id: route.id,
            station_id: Some(station.id),
            bus_id,
            fare: station.fare,
            external_session_id: String::new(),
        };
        Ok((checkout, record))
    }
}

/// El bus tiene que circular por la ruta de la estación y, si la estación
/// tiene bus asignado, ser ese mismo.
pub(crate) fn ensure_bus_serves_station(bus: &Bus, station: &Station) -> AppResult<()> {
    if bus.route_id != station.route_id {
        return Err(validation_error("busId", "Bus does not run on the station's route"));
    }
    if station.bus_id.is_some_and(|id| id != bus.id) {
        return Err(validation_error("busId", "Bus does not serve the selected station"));
    }
    Ok(())
}

/// Consultar la sesión en la pasarela; solo `paid` cuenta como pagada.
pub(crate) async fn verify_paid(
    gateway: &dyn PaymentGateway,
    session_id: &str,
) -> AppResult<SessionStatus> {
    match gateway.retrieve_session(session_id.trim()).await? {
        Some(session) if session.is_paid() => Ok(session),
        Some(session) => {
            warn!(
                "⚠️ Sesión {} no pagada (estado: {})",
                session.id, session.payment_status
            );
            Err(AppError::PaymentNotConfirmed("Payment not confirmed".to_string()))
        }
        None => {
            warn!("⚠️ Sesión de pago {} inexistente", session_id);
            Err(AppError::PaymentNotConfirmed("Payment not confirmed".to_string()))
        }
    }
}

/// Registro de pago de la sesión, si existe, comprobado contra la compra en curso.
///
/// Un registro ya completado no se puede reutilizar.
pub(crate) async fn pending_record(
    payments: &dyn PaymentRepository,
    session_id: &str,
    kind: PaymentKind,
    user_id: &str,
) -> AppResult<Option<PaymentRecord>> {
    let Some(record) = payments.find_by_session_id(session_id.trim()).await? else {
        return Ok(None);
    };

    if record.kind != kind {
        return Err(validation_error(
            "sessionId",
            "Payment session belongs to a different purchase type",
        ));
    }
    if record.is_completed() {
        return Err(AppError::Conflict("Payment session has already been used".to_string()));
    }
    if record.user_id != user_id {
        return Err(validation_error("userId", "Payment session belongs to a different user"));
    }
    Ok(Some(record))
}
