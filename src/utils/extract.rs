//! Extractores de cuerpo y query con errores de la API
//!
//! Los rechazos de `Json` y `Query` de axum responden en texto plano; estos
//! envoltorios los convierten en `AppError` para que todo error salga con el
//! mismo cuerpo JSON.

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::{ValidationError, ValidationErrors};

use super::errors::AppError;

/// `Json<T>` cuyo rechazo es un `AppError`
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

/// `Query<T>` cuyo rechazo es un `AppError`
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(value))
    }
}

/// Error de validación con el texto del rechazo de serde
fn invalid_field(field: &'static str, message: String) -> AppError {
    let mut error = ValidationError::new("invalid");
    error.message = Some(message.into());

    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    AppError::Validation(errors)
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // JSON bien formado con campos de tipo o valor incorrecto
            JsonRejection::JsonDataError(e) => invalid_field("body", e.body_text()),
            JsonRejection::JsonSyntaxError(e) => {
                AppError::BadRequest(format!("Malformed JSON body: {}", e.body_text()))
            }
            JsonRejection::MissingJsonContentType(_) => AppError::BadRequest(
                "Expected request with `Content-Type: application/json`".to_string(),
            ),
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        invalid_field("query", rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum Kind {
        Pass,
    }

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(rename = "type")]
        kind: Kind,
    }

    fn json_request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_variant_is_validation_error() {
        let result = ApiJson::<Payload>::from_request(json_request(r#"{"type":"subscription"}"#), &()).await;
        match result {
            Err(AppError::Validation(errors)) => {
                assert!(errors.field_errors().contains_key("body"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_truncated_body_is_bad_request() {
        let result = ApiJson::<Payload>::from_request(json_request(r#"{"type":"pa"#), &()).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_valid_body_is_extracted() {
        let ApiJson(payload) = ApiJson::<Payload>::from_request(json_request(r#"{"type":"pass"}"#), &())
            .await
            .unwrap();
        assert!(matches!(payload.kind, Kind::Pass));
    }
}
