//! Ciclo de vida del pase mensual
//!
//! `NoActivePass -> ActivePass` solo a través de una compra confirmada;
//! la vuelta a `NoActivePass` ocurre al pasar `expiry_date`.

use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;
use validator::Validate;

use crate::controllers::payment_controller::{pending_record, verify_paid};
use crate::dto::common::{ApiResponse, RouteSummary};
use crate::dto::pass_dto::{ConfirmPassRequest, PassResponse};
use crate::models::{NewPass, PaymentKind};
use crate::repositories::{PassRepository, PaymentRepository, Repositories, RouteRepository};
use crate::services::PaymentGateway;
use crate::utils::errors::{not_found_error, validation_error, AppError};
use crate::utils::validation::{parse_optional_id, require_user_id};

pub struct PassController {
    passes: Arc<dyn PassRepository>,
    routes: Arc<dyn RouteRepository>,
    payments: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
}

impl PassController {
    pub fn new(repos: &Repositories, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            passes: repos.passes.clone(),
            routes: repos.routes.clone(),
            payments: repos.payments.clone(),
            gateway,
        }
    }

    /// Pase vigente del usuario con su ruta resuelta
    pub async fn get_active_pass(&self, user_id: Option<&str>) -> Result<PassResponse, AppError> {
        let user_id = require_user_id(user_id)?;

        let pass = self
            .passes
            .find_active_for_user(&user_id, Utc::now())
            .await?
            .ok_or_else(|| AppError::NoActivePass("No active pass found".to_string()))?;

        let route = self.routes.find_by_id(pass.route_id).await?;
        Ok(PassResponse::new(pass, route.as_ref().map(RouteSummary::from)))
    }

    pub async fn confirm_purchase(
        &self,
        request: ConfirmPassRequest,
    ) -> Result<ApiResponse<PassResponse>, AppError> {
        request.validate()?;
        let user_id = request.user_id.trim().to_string();

        verify_paid(self.gateway.as_ref(), &request.session_id).await?;
        let record = pending_record(
            self.payments.as_ref(),
            &request.session_id,
            PaymentKind::Pass,
            &user_id,
        )
        .await?;

        let client_route = parse_optional_id("routeId", Some(request.route_id.as_str()))?;
        let (route_id, fare) = match &record {
            Some(record) => {
                if client_route.is_some_and(|id| id != record.route_id) {
                    return Err(validation_error("routeId", "Route does not match the payment session"));
                }
                if request.fare.is_some_and(|fare| fare != record.fare) {
                    return Err(validation_error("fare", "Fare does not match the payment session"));
                }
                (record.route_id, record.fare)
            }
            // Checkout sin registro: se usan los datos del cliente
            None => {
                let route_id = client_route
                    .ok_or_else(|| AppError::BadRequest("routeId is required".to_string()))?;
                let fare = request
                    .fare
                    .ok_or_else(|| validation_error("fare", "Fare is required"))?;
                (route_id, fare)
            }
        };

        let route = self
            .routes
            .find_by_id(route_id)
            .await?
            .ok_or_else(|| not_found_error("Route", &route_id.to_string()))?;

        let new = NewPass::purchased_at(user_id.clone(), route.id, fare, Utc::now())
            .ok_or_else(|| AppError::Internal("Pass expiry date out of range".to_string()))?;

        let pass = self.passes.create_if_none_active(new).await?.ok_or_else(|| {
            warn!("⚠️ El usuario {} ya tiene un pase activo", user_id);
            AppError::AlreadyActive("User already has an active pass".to_string())
        })?;

        if let Some(record) = &record {
            if !self.payments.mark_completed(&record.external_session_id).await? {
                warn!(
                    "⚠️ La sesión {} ya estaba completada al emitir el pase {}",
                    record.external_session_id, pass.id
                );
            }
        }

        info!(
            "🎫 Pase {} emitido para {} en {} (vence {})",
            pass.id,
            pass.user_id,
            route.label(),
            pass.expiry_date
        );

        Ok(ApiResponse::success_with_message(
            PassResponse::new(pass, Some(RouteSummary::from(&route))),
            "Pass purchased successfully",
        ))
    }
}
