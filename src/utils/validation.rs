//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use rust_decimal::Decimal;
use uuid::Uuid;
use validator::ValidationError;

use crate::utils::errors::{AppError, AppResult};

/// Validar y convertir string a UUID
pub fn validate_uuid(value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        let mut error = ValidationError::new("uuid");
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Convertir un identificador recibido por la API en UUID
pub fn parse_id(field: &str, value: &str) -> AppResult<Uuid> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    validate_uuid(value).map_err(|_| AppError::BadRequest(format!("Invalid {} format", field)))
}

/// Igual que `parse_id` pero para campos opcionales
pub fn parse_optional_id(field: &str, value: Option<&str>) -> AppResult<Option<Uuid>> {
    match value {
        Some(v) if !v.trim().is_empty() => parse_id(field, v).map(Some),
        _ => Ok(None),
    }
}

/// Exigir el identificador externo del usuario (query string o body)
pub fn require_user_id(value: Option<&str>) -> AppResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::BadRequest("User ID is required".to_string())),
    }
}

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Validar tarifa: no negativa y con a lo sumo dos decimales
pub fn validate_fare(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    if value.normalize().scale() > 2 {
        let mut error = ValidationError::new("fare_precision");
        error.add_param("value".into(), &value.to_string());
        error.add_param("max_decimals".into(), &2);
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_validate_uuid() {
        let valid_uuid = "550e8400-e29b-41d4-a716-446655440000";
        assert!(validate_uuid(valid_uuid).is_ok());

        let invalid_uuid = "invalid-uuid";
        assert!(validate_uuid(invalid_uuid).is_err());
    }

    #[test]
    fn test_parse_id_maps_to_bad_request() {
        assert!(matches!(parse_id("routeId", ""), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_id("routeId", "nope"), Err(AppError::BadRequest(_))));
        assert!(parse_optional_id("busId", None).unwrap().is_none());
        assert!(parse_optional_id("busId", Some("  ")).unwrap().is_none());
    }

    #[test]
    fn test_require_user_id() {
        assert_eq!(require_user_id(Some(" user_1 ")).unwrap(), "user_1");
        assert!(require_user_id(Some("   ")).is_err());
        assert!(require_user_id(None).is_err());
    }

    #[test]
    fn test_validate_fare() {
        assert!(validate_fare(&Decimal::from_str("19.99").unwrap()).is_ok());
        assert!(validate_fare(&Decimal::from_str("50.00").unwrap()).is_ok());
        assert!(validate_fare(&Decimal::ZERO).is_ok());
        assert!(validate_fare(&Decimal::from_str("-1").unwrap()).is_err());
        assert!(validate_fare(&Decimal::from_str("1.999").unwrap()).is_err());
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Central").is_ok());
        assert!(validate_not_blank("  ").is_err());
    }
}
