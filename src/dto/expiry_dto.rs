use serde::Serialize;

use crate::services::ExpiryReport;

#[derive(Debug, Serialize)]
pub struct ExpiryCheckResponse {
    pub message: String,
    #[serde(flatten)]
    pub report: ExpiryReport,
}
