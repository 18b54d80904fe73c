use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::pass_usage_controller::PassUsageController;
use crate::dto::common::{ApiResponse, UserQuery};
use crate::dto::pass_usage_dto::{PassUsageResponse, RecordScanRequest};
use crate::models::PassUsage;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiQuery};

pub fn create_pass_usage_router() -> Router<AppState> {
    Router::new().route("/", get(get_history).post(record_scan))
}

async fn get_history(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<Vec<PassUsageResponse>>, AppError> {
    let controller = PassUsageController::new(&state.repos);
    Ok(Json(controller.get_history(query.user_id.as_deref()).await?))
}

async fn record_scan(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RecordScanRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PassUsage>>), AppError> {
    let controller = PassUsageController::new(&state.repos);
    let response = controller.record_scan(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
