use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Escaneo de un pase. Solo se insertan, nunca se modifican.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PassUsage {
    pub id: Uuid,
    pub user_id: String,
    pub pass_id: Uuid,
    pub scanned_at: DateTime<Utc>,
    pub location: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPassUsage {
    pub user_id: String,
    pub pass_id: Uuid,
    pub scanned_at: DateTime<Utc>,
    pub location: Option<String>,
}

impl PassUsage {
    pub fn from_new(id: Uuid, new: NewPassUsage) -> Self {
        Self {
            id,
            user_id: new.user_id,
            pass_id: new.pass_id,
            scanned_at: new.scanned_at,
            location: new.location,
        }
    }
}
