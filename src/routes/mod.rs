//! Routers de la API
//!
//! Un router por recurso, montados bajo `/api` por `create_app`.

pub mod bus_routes;
pub mod expiry_routes;
pub mod pass_routes;
pub mod pass_usage_routes;
pub mod payment_routes;
pub mod route_routes;
pub mod station_routes;
pub mod ticket_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use crate::state::AppState;

/// Construir la aplicación completa con sus capas
pub fn create_app(state: AppState) -> Router {
    let cors = if state.config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(state.config.cors_origins.clone())
    };

    let api = Router::new()
        .nest("/routes", route_routes::create_route_router())
        .nest("/buses", bus_routes::create_bus_router())
        .nest("/stations", station_routes::create_station_router())
        .nest("/pass", pass_routes::create_pass_router())
        .nest("/payment-session", payment_routes::create_payment_router())
        .nest("/tickets", ticket_routes::create_ticket_router())
        .nest("/pass-usage", pass_usage_routes::create_pass_usage_router())
        .nest("/expiry-check", expiry_routes::create_expiry_router());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
