use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::expiry_controller::ExpiryController;
use crate::dto::expiry_dto::ExpiryCheckResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_expiry_router() -> Router<AppState> {
    Router::new().route("/", get(run_expiry_check))
}

async fn run_expiry_check(
    State(state): State<AppState>,
) -> Result<Json<ExpiryCheckResponse>, AppError> {
    let controller = ExpiryController::new(&state);
    Ok(Json(controller.run_check().await?))
}
