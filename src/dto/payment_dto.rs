use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::PaymentKind;
use crate::utils::validation::{validate_fare, validate_not_blank};

// Request para abrir una sesión de checkout
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentSessionRequest {
    #[serde(rename = "type")]
    #[validate(required)]
    pub kind: Option<PaymentKind>,

    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub user_id: String,

    pub route_id: Option<String>,
    pub station_id: Option<String>,
    pub bus_id: Option<String>,

    #[validate(custom = "validate_fare")]
    pub fare: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionResponse {
    pub session_id: String,
    pub redirect_url: String,
}
