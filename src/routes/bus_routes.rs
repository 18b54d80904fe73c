use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::bus_controller::BusController;
use crate::dto::bus_dto::{BusQuery, BusResponse, CreateBusRequest, UpdateBusRequest};
use crate::dto::common::{ApiResponse, IdQuery};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiQuery};

pub fn create_bus_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_buses)
            .post(create_bus)
            .put(update_bus)
            .delete(delete_bus),
    )
}

async fn list_buses(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<BusQuery>,
) -> Result<Json<Vec<BusResponse>>, AppError> {
    let controller = BusController::new(&state.repos);
    Ok(Json(controller.list(query.route_id.as_deref()).await?))
}

async fn create_bus(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateBusRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BusResponse>>), AppError> {
    let controller = BusController::new(&state.repos);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_bus(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateBusRequest>,
) -> Result<Json<ApiResponse<BusResponse>>, AppError> {
    let controller = BusController::new(&state.repos);
    Ok(Json(controller.update(request).await?))
}

async fn delete_bus(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = BusController::new(&state.repos);
    controller.delete(query.id.as_deref()).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Bus deleted successfully"
    })))
}
