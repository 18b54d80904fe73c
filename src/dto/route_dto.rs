use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::models::NewRoute;
use crate::utils::validation::{validate_fare, validate_not_blank};

// Request para crear una ruta
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRouteRequest {
    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub start: String,

    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub end: String,

    #[validate(required, custom = "validate_fare")]
    pub fare: Option<Decimal>,
}

// Request para actualizar una ruta (reemplazo completo)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRouteRequest {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub start: String,

    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub end: String,

    #[validate(required, custom = "validate_fare")]
    pub fare: Option<Decimal>,
}

impl CreateRouteRequest {
    /// Solo tras `validate()`
    pub fn into_new_route(self) -> NewRoute {
        NewRoute {
            start: self.start.trim().to_string(),
            end: self.end.trim().to_string(),
            fare: self.fare.unwrap_or_default(),
        }
    }
}

impl UpdateRouteRequest {
    pub fn into_new_route(self) -> NewRoute {
        NewRoute {
            start: self.start.trim().to_string(),
            end: self.end.trim().to_string(),
            fare: self.fare.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_route_requires_all_fields() {
        let request: CreateRouteRequest =
            serde_json::from_value(serde_json::json!({ "start": "A", "end": " " })).unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("end"));
        assert!(fields.contains_key("fare"));
        assert!(!fields.contains_key("start"));
    }

    #[test]
    fn test_create_route_rejects_negative_fare() {
        let request: CreateRouteRequest =
            serde_json::from_value(serde_json::json!({ "start": "A", "end": "B", "fare": -5 }))
                .unwrap();
        assert!(request.validate().is_err());

        let request: CreateRouteRequest =
            serde_json::from_value(serde_json::json!({ "start": "A", "end": "B", "fare": 19.99 }))
                .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.into_new_route().fare.to_string(), "19.99");
    }
}
