//! Adaptador de la pasarela de pago
//!
//! Checkout alojado: se crea una sesión, el cliente paga en la página de la
//! pasarela y al volver se consulta el estado de la sesión. Solo
//! `payment_status == "paid"` cuenta como pago confirmado.

use async_trait::async_trait;
use num_traits::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

/// Datos para abrir una sesión de checkout
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Importe en unidades mayores (p. ej. 19.99)
    pub amount: Decimal,
    pub description: String,
    pub success_url: String,
    pub cancel_url: String,
    pub customer_email: Option<String>,
    pub metadata: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionStatus {
    pub id: String,
    pub payment_status: String,
    #[serde(default)]
    pub payment_intent: Option<String>,
}

impl SessionStatus {
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(&self, request: CheckoutRequest) -> AppResult<CheckoutSession>;
    /// `None` si la pasarela no conoce la sesión
    async fn retrieve_session(&self, session_id: &str) -> AppResult<Option<SessionStatus>>;
}

/// Convertir un importe en unidades mayores a unidades menores enteras.
///
/// Redondea al entero más cercano (mitades hacia fuera del cero), nunca trunca:
/// 19.99 → 1999 aunque el valor venga de un `f64` impreciso.
pub fn to_minor_units(amount: Decimal) -> AppResult<i64> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AppError::BadRequest("Amount must not be negative".to_string()));
    }
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|cents| cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| AppError::BadRequest(format!("Amount {} is out of range", amount)))
}

/// Cliente de Stripe Checkout sobre la API REST
pub struct StripeGateway {
    secret_key: String,
    api_base: String,
    currency: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct StripeCheckoutSession {
    id: String,
    url: Option<String>,
}

impl StripeGateway {
    pub fn new(
        secret_key: String,
        api_base: String,
        currency: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            secret_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            currency,
            client,
        })
    }

    fn checkout_form(&self, request: &CheckoutRequest, unit_amount: i64) -> Vec<(String, String)> {
        let mut form = vec![
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("success_url".to_string(), request.success_url.clone()),
            ("cancel_url".to_string(), request.cancel_url.clone()),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            ("line_items[0][price_data][currency]".to_string(), self.currency.clone()),
            ("line_items[0][price_data][unit_amount]".to_string(), unit_amount.to_string()),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                request.description.clone(),
            ),
        ];
        if let Some(email) = &request.customer_email {
            form.push(("customer_email".to_string(), email.clone()));
        }
        for (key, value) in &request.metadata {
            form.push((format!("metadata[{}]", key), value.clone()));
        }
        form
    }
}

/// Codificar pares clave/valor como `application/x-www-form-urlencoded`
fn encode_form(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout_session(&self, request: CheckoutRequest) -> AppResult<CheckoutSession> {
        let unit_amount = to_minor_units(request.amount)?;
        log::info!(
            "💳 Creando sesión de checkout: {} ({} {})",
            request.description,
            unit_amount,
            self.currency
        );

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(encode_form(&self.checkout_form(&request, unit_amount)))
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Checkout session request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ Stripe respondió {}: {}", status, error_text);
            return Err(AppError::ExternalApi(format!(
                "Failed to create checkout session: {}",
                status
            )));
        }

        let session: StripeCheckoutSession = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Invalid checkout session response: {}", e)))?;

        let url = session
            .url
            .ok_or_else(|| AppError::ExternalApi("Checkout session has no redirect URL".to_string()))?;

        log::info!("✅ Sesión de checkout creada: {}", session.id);
        Ok(CheckoutSession { id: session.id, url })
    }

    async fn retrieve_session(&self, session_id: &str) -> AppResult<Option<SessionStatus>> {
        let response = self
            .client
            .get(format!(
                "{}/v1/checkout/sessions/{}",
                self.api_base,
                urlencoding::encode(session_id)
            ))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Checkout session lookup failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            log::warn!("⚠️ Sesión de checkout desconocida: {}", session_id);
            return Ok(None);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ Stripe respondió {}: {}", status, error_text);
            return Err(AppError::ExternalApi(format!(
                "Failed to retrieve checkout session: {}",
                status
            )));
        }

        let session: SessionStatus = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Invalid checkout session response: {}", e)))?;

        Ok(Some(session))
    }
}

/// Sesión registrada por la pasarela simulada
#[derive(Debug, Clone, PartialEq)]
pub struct MockSession {
    pub id: String,
    pub unit_amount: i64,
    pub description: String,
    pub success_url: String,
    pub payment_status: String,
    pub payment_intent: Option<String>,
}

/// Pasarela simulada para tests y desarrollo local.
///
/// Las sesiones nacen `unpaid`; `mark_paid` simula el pago en la página alojada.
#[derive(Default)]
pub struct MockPaymentGateway {
    sessions: RwLock<HashMap<String, MockSession>>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mark_paid(&self, session_id: &str) -> bool {
        self.set_status(session_id, "paid").await
    }

    pub async fn set_status(&self, session_id: &str, payment_status: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session_id) {
            Some(session) => {
                session.payment_status = payment_status.to_string();
                if payment_status == "paid" && session.payment_intent.is_none() {
                    session.payment_intent = Some(format!("pi_mock_{}", Uuid::new_v4().simple()));
                }
                true
            }
            None => false,
        }
    }

    /// Registrar una sesión ya pagada creada fuera de esta API
    pub async fn insert_paid_session(&self, session_id: &str, unit_amount: i64) {
        self.sessions.write().await.insert(
            session_id.to_string(),
            MockSession {
                id: session_id.to_string(),
                unit_amount,
                description: String::new(),
                success_url: String::new(),
                payment_status: "paid".to_string(),
                payment_intent: Some(format!("pi_mock_{}", Uuid::new_v4().simple())),
            },
        );
    }

    pub async fn session(&self, session_id: &str) -> Option<MockSession> {
        self.sessions.read().await.get(session_id).cloned()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_checkout_session(&self, request: CheckoutRequest) -> AppResult<CheckoutSession> {
        let unit_amount = to_minor_units(request.amount)?;
        let id = format!("cs_test_{}", Uuid::new_v4().simple());
        let url = format!("https://checkout.mock/pay/{}", id);

        self.sessions.write().await.insert(
            id.clone(),
            MockSession {
                id: id.clone(),
                unit_amount,
                description: request.description,
                success_url: request.success_url,
                payment_status: "unpaid".to_string(),
                payment_intent: None,
            },
        );

        Ok(CheckoutSession { id, url })
    }

    async fn retrieve_session(&self, session_id: &str) -> AppResult<Option<SessionStatus>> {
        Ok(self.sessions.read().await.get(session_id).map(|s| SessionStatus {
            id: s.id.clone(),
            payment_status: s.payment_status.clone(),
            payment_intent: s.payment_intent.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_minor_units_exact_for_two_decimal_fares() {
        assert_eq!(to_minor_units(Decimal::from_str("19.99").unwrap()).unwrap(), 1999);
        assert_eq!(to_minor_units(Decimal::from_str("0.29").unwrap()).unwrap(), 29);
        assert_eq!(to_minor_units(Decimal::from_str("50").unwrap()).unwrap(), 5000);
        assert_eq!(to_minor_units(Decimal::ZERO).unwrap(), 0);
    }

    #[test]
    fn test_minor_units_rounds_float_inputs() {
        // Cada tarifa de dos decimales, pasada por f64, vuelve a su valor exacto en céntimos
        for cents in 0..200_000i64 {
            let fare = cents as f64 / 100.0;
            let decimal = Decimal::from_f64_retain(fare).unwrap();
            assert_eq!(to_minor_units(decimal).unwrap(), cents, "fare {}", fare);
        }
    }

    #[test]
    fn test_minor_units_from_json_number() {
        let fare: Decimal = serde_json::from_str("19.99").unwrap();
        assert_eq!(to_minor_units(fare).unwrap(), 1999);
    }

    #[test]
    fn test_minor_units_rejects_negative() {
        assert!(to_minor_units(Decimal::from_str("-1.00").unwrap()).is_err());
    }

    #[test]
    fn test_minor_units_out_of_range_is_bad_request() {
        match to_minor_units(Decimal::MAX) {
            Err(AppError::BadRequest(msg)) => assert!(msg.contains("out of range")),
            other => panic!("unexpected result: {:?}", other),
        }
        // Cabe en Decimal pero no en i64
        assert!(matches!(
            to_minor_units(Decimal::from(i64::MAX)),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_checkout_form_encoding() {
        let gateway = StripeGateway::new(
            "sk_test".into(),
            "https://api.stripe.com/".into(),
            "inr".into(),
            Duration::from_secs(5),
        )
        .unwrap();
        let request = CheckoutRequest {
            amount: Decimal::from_str("19.99").unwrap(),
            description: "Central Ticket".into(),
            success_url: "http://localhost:3000/ticket?status=success&session_id={CHECKOUT_SESSION_ID}".into(),
            cancel_url: "http://localhost:3000/ticket?status=cancel".into(),
            customer_email: None,
            metadata: vec![("user_id".into(), "u1".into())],
        };

        let body = encode_form(&gateway.checkout_form(&request, 1999));
        assert!(body.contains("line_items%5B0%5D%5Bprice_data%5D%5Bunit_amount%5D=1999"));
        assert!(body.contains("line_items%5B0%5D%5Bprice_data%5D%5Bcurrency%5D=inr"));
        assert!(body.contains("session_id%3D%7BCHECKOUT_SESSION_ID%7D"));
        assert!(body.contains("metadata%5Buser_id%5D=u1"));
        assert_eq!(gateway.api_base, "https://api.stripe.com");
    }

    #[tokio::test]
    async fn test_mock_gateway_lifecycle() {
        let gateway = MockPaymentGateway::new();
        let session = gateway
            .create_checkout_session(CheckoutRequest {
                amount: Decimal::new(50, 0),
                description: "Monthly Travel Pass".into(),
                success_url: "s".into(),
                cancel_url: "c".into(),
                customer_email: None,
                metadata: Vec::new(),
            })
            .await
            .unwrap();

        let status = gateway.retrieve_session(&session.id).await.unwrap().unwrap();
        assert!(!status.is_paid());

        assert!(gateway.mark_paid(&session.id).await);
        let status = gateway.retrieve_session(&session.id).await.unwrap().unwrap();
        assert!(status.is_paid());
        assert!(status.payment_intent.is_some());

        assert_eq!(gateway.session(&session.id).await.unwrap().unit_amount, 5000);
        assert!(gateway.retrieve_session("cs_unknown").await.unwrap().is_none());
    }
}
