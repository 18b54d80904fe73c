use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::route_controller::RouteController;
use crate::dto::common::{ApiResponse, IdQuery};
use crate::dto::route_dto::{CreateRouteRequest, UpdateRouteRequest};
use crate::models::Route;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiQuery};

pub fn create_route_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_routes)
            .post(create_route)
            .put(update_route)
            .delete(delete_route),
    )
}

async fn list_routes(State(state): State<AppState>) -> Result<Json<Vec<Route>>, AppError> {
    let controller = RouteController::new(&state.repos);
    Ok(Json(controller.list().await?))
}

async fn create_route(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateRouteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Route>>), AppError> {
    let controller = RouteController::new(&state.repos);
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_route(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateRouteRequest>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let controller = RouteController::new(&state.repos);
    Ok(Json(controller.update(request).await?))
}

async fn delete_route(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = RouteController::new(&state.repos);
    controller.delete(query.id.as_deref()).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Route deleted successfully"
    })))
}
