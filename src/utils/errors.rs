//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No active pass: {0}")]
    NoActivePass(String),

    #[error("Payment not confirmed: {0}")]
    PaymentNotConfirmed(String),

    #[error("Already active: {0}")]
    AlreadyActive(String),

    #[error("Pass expired or invalid: {0}")]
    PassExpiredOrInvalid(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details: None,
            code: Some(code.to_string()),
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl AppError {
    /// Código de estado HTTP asociado al error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::PaymentNotConfirmed(_)
            | AppError::AlreadyActive(_)
            | AppError::PassExpiredOrInvalid(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::NoActivePass(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::ExternalApi(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = match self {
            AppError::Database(e) => {
                log::error!("❌ Database error: {}", e);
                ErrorResponse::new(
                    "Database Error",
                    "An error occurred while accessing the database".to_string(),
                    "DB_ERROR",
                )
                .with_details(json!({ "sql_error": e }))
            }

            AppError::Validation(e) => {
                log::warn!("⚠️ Validation error: {}", e);
                ErrorResponse::new(
                    "Validation Error",
                    "The provided data is invalid".to_string(),
                    "VALIDATION_ERROR",
                )
                .with_details(json!(e))
            }

            AppError::BadRequest(msg) => {
                log::warn!("⚠️ Bad request: {}", msg);
                ErrorResponse::new("Bad Request", msg, "BAD_REQUEST")
            }

            AppError::NotFound(msg) => {
                log::warn!("🔍 Resource not found: {}", msg);
                ErrorResponse::new("Not Found", msg, "NOT_FOUND")
            }

            AppError::NoActivePass(msg) => {
                log::info!("🎫 No active pass: {}", msg);
                ErrorResponse::new("Not Found", msg, "NO_ACTIVE_PASS")
                    .with_details(json!({ "expired": true }))
            }

            AppError::PaymentNotConfirmed(msg) => {
                log::warn!("💳 Payment not confirmed: {}", msg);
                ErrorResponse::new("Payment Not Confirmed", msg, "PAYMENT_NOT_CONFIRMED")
            }

            AppError::AlreadyActive(msg) => {
                log::warn!("🎫 Already active: {}", msg);
                ErrorResponse::new("Already Active", msg, "ALREADY_ACTIVE")
            }

            AppError::PassExpiredOrInvalid(msg) => {
                log::warn!("⛔ Pass expired or invalid: {}", msg);
                ErrorResponse::new("Pass Expired Or Invalid", msg, "PASS_EXPIRED_OR_INVALID")
            }

            AppError::Conflict(msg) => {
                log::warn!("⚠️ Conflict: {}", msg);
                ErrorResponse::new("Conflict", msg, "CONFLICT")
            }

            AppError::ExternalApi(msg) => {
                log::error!("❌ External API error: {}", msg);
                ErrorResponse::new(
                    "External API Error",
                    "An error occurred while communicating with external service".to_string(),
                    "EXTERNAL_API_ERROR",
                )
                .with_details(json!({ "external_api_error": msg }))
            }

            AppError::Internal(msg) => {
                log::error!("❌ Internal error: {}", msg);
                ErrorResponse::new(
                    "Internal Server Error",
                    "An unexpected error occurred".to_string(),
                    "INTERNAL_ERROR",
                )
                .with_details(json!({ "internal_error": msg }))
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.message = Some(message.into());
    error.add_param("field".into(), &field);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(bad_request_error("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(not_found_error("Route", "1").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::PaymentNotConfirmed("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::AlreadyActive("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::ExternalApi("stripe down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::NoActivePass("u1".into()).status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_error_names_field() {
        match validation_error("userId", "userId is required") {
            AppError::Validation(errors) => {
                assert!(errors.field_errors().contains_key("userId"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
