use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::ticket_controller::TicketController;
use crate::dto::common::{ApiResponse, UserQuery};
use crate::dto::ticket_dto::{CreateTicketRequest, TicketResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiQuery};

pub fn create_ticket_router() -> Router<AppState> {
    Router::new().route("/", get(list_tickets).post(create_ticket))
}

async fn list_tickets(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<Vec<TicketResponse>>, AppError> {
    let controller = TicketController::new(&state.repos, state.gateway.clone());
    Ok(Json(controller.list_tickets(query.user_id.as_deref()).await?))
}

async fn create_ticket(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateTicketRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TicketResponse>>), AppError> {
    let controller = TicketController::new(&state.repos, state.gateway.clone());
    let response = controller.create_ticket(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
