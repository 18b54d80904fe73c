use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::station_controller::StationController;
use crate::dto::common::{ApiResponse, IdQuery};
use crate::dto::station_dto::{
    CreateStationRequest, StationQuery, StationResponse, UpdateStationRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiQuery};

pub fn create_station_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_stations)
            .post(create_station)
            .put(update_station)
            .delete(delete_station),
    )
}

async fn list_stations(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StationQuery>,
) -> Result<Json<Vec<StationResponse>>, AppError> {
    let controller = StationController::new(&state.repos);
    Ok(Json(controller.list(query).await?))
}

async fn create_station(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateStationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StationResponse>>), AppError> {
    let controller = StationController::new(&state.repos);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_station(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateStationRequest>,
) -> Result<Json<ApiResponse<StationResponse>>, AppError> {
    let controller = StationController::new(&state.repos);
    Ok(Json(controller.update(request).await?))
}

async fn delete_station(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = StationController::new(&state.repos);
    controller.delete(query.id.as_deref()).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Station deleted successfully"
    })))
}
