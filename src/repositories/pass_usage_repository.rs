use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewPassUsage, PassUsage};
use crate::utils::errors::{AppError, AppResult};

/// Registro de escaneos, solo inserción
#[async_trait]
pub trait PassUsageRepository: Send + Sync {
    async fn append(&self, usage: NewPassUsage) -> AppResult<PassUsage>;
    /// Escaneos del usuario, el más reciente primero
    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<PassUsage>>;
}

pub struct PgPassUsageRepository {
    pool: PgPool,
}

impl PgPassUsageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PassUsageRepository for PgPassUsageRepository {
    async fn append(&self, usage: NewPassUsage) -> AppResult<PassUsage> {
        sqlx::query_as::<_, PassUsage>(
            r#"
            INSERT INTO pass_usages (id, user_id, pass_id, scanned_at, location)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(usage.user_id)
        .bind(usage.pass_id)
        .bind(usage.scanned_at)
        .bind(usage.location)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error recording pass usage: {}", e)))
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<PassUsage>> {
        sqlx::query_as::<_, PassUsage>(
            "SELECT * FROM pass_usages WHERE user_id = $1 ORDER BY scanned_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error listing pass usage: {}", e)))
    }
}
