use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::RouteSummary;
use crate::models::Pass;
use crate::utils::validation::{validate_fare, validate_not_blank};

/// Confirmación de compra tras volver del checkout.
///
/// `fare` es opcional: si existe un registro de pago para la sesión, manda
/// la tarifa guardada en el servidor.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPassRequest {
    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub user_id: String,

    #[serde(default)]
    pub route_id: String,

    #[validate(custom = "validate_fare")]
    pub fare: Option<Decimal>,

    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub session_id: String,
}

// Response de pase con la ruta resuelta
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassResponse {
    pub id: Uuid,
    pub user_id: String,
    pub route_id: Uuid,
    pub route: Option<RouteSummary>,
    pub fare: Decimal,
    pub purchase_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
}

impl PassResponse {
    pub fn new(pass: Pass, route: Option<RouteSummary>) -> Self {
        Self {
            id: pass.id,
            user_id: pass.user_id,
            route_id: pass.route_id,
            route,
            fare: pass.fare,
            purchase_date: pass.purchase_date,
            expiry_date: pass.expiry_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_request_reads_camel_case() {
        let request: ConfirmPassRequest = serde_json::from_value(serde_json::json!({
            "userId": "u1",
            "routeId": "550e8400-e29b-41d4-a716-446655440000",
            "fare": "50",
            "sessionId": "cs_test_1"
        }))
        .unwrap();

        assert!(request.validate().is_ok());
        assert_eq!(request.fare, Some(Decimal::new(50, 0)));
        assert_eq!(request.session_id, "cs_test_1");
    }

    #[test]
    fn test_confirm_request_requires_session() {
        let request: ConfirmPassRequest =
            serde_json::from_value(serde_json::json!({ "userId": "u1", "routeId": "x" })).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("session_id"));
    }
}
