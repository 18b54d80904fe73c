use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::RouteSummary;
use crate::models::PassUsage;
use crate::utils::validation::validate_not_blank;

// Request de escaneo
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordScanRequest {
    #[serde(default)]
    #[validate(custom = "validate_not_blank")]
    pub user_id: String,

    #[serde(default)]
    pub pass_id: String,

    #[validate(length(max = 255))]
    pub location: Option<String>,
}

/// Pase referenciado por un escaneo, tal como se muestra en el historial
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsagePassSummary {
    pub id: Uuid,
    pub expiry_date: DateTime<Utc>,
    pub route: Option<RouteSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassUsageResponse {
    pub id: Uuid,
    pub user_id: String,
    pub pass_id: Uuid,
    pub scanned_at: DateTime<Utc>,
    pub location: Option<String>,
    pub pass: Option<UsagePassSummary>,
}

impl PassUsageResponse {
    pub fn new(usage: PassUsage, pass: Option<UsagePassSummary>) -> Self {
        Self {
            id: usage.id,
            user_id: usage.user_id,
            pass_id: usage.pass_id,
            scanned_at: usage.scanned_at,
            location: usage.location,
            pass,
        }
    }
}
