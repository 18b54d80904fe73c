use axum::{extract::State, routing::post, Json, Router};

use crate::controllers::payment_controller::PaymentController;
use crate::dto::payment_dto::{CreatePaymentSessionRequest, PaymentSessionResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ApiJson;

pub fn create_payment_router() -> Router<AppState> {
    Router::new().route("/", post(create_payment_session))
}

async fn create_payment_session(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreatePaymentSessionRequest>,
) -> Result<Json<PaymentSessionResponse>, AppError> {
    let controller =
        PaymentController::new(&state.repos, state.gateway.clone(), state.config.clone());
    Ok(Json(controller.create_payment_session(request).await?))
}
