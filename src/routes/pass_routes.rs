use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::pass_controller::PassController;
use crate::dto::common::{ApiResponse, UserQuery};
use crate::dto::pass_dto::{ConfirmPassRequest, PassResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiQuery};

pub fn create_pass_router() -> Router<AppState> {
    Router::new().route("/", get(get_active_pass).post(confirm_pass))
}

async fn get_active_pass(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<PassResponse>, AppError> {
    let controller = PassController::new(&state.repos, state.gateway.clone());
    Ok(Json(controller.get_active_pass(query.user_id.as_deref()).await?))
}

async fn confirm_pass(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ConfirmPassRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PassResponse>>), AppError> {
    let controller = PassController::new(&state.repos, state.gateway.clone());
    let response = controller.confirm_purchase(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
