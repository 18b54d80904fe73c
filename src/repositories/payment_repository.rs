use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewPaymentRecord, PaymentRecord};
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, record: NewPaymentRecord) -> AppResult<PaymentRecord>;
    async fn find_by_session_id(&self, session_id: &str) -> AppResult<Option<PaymentRecord>>;
    /// Pasa el registro de `pending` a `completed`; `false` si ya estaba completado o no existe
    async fn mark_completed(&self, session_id: &str) -> AppResult<bool>;
}

pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn create(&self, record: NewPaymentRecord) -> AppResult<PaymentRecord> {
        sqlx::query_as::<_, PaymentRecord>(
            r#"
            INSERT INTO payments (id, user_id, payment_type, route_id, station_id, bus_id,
                                  fare, external_session_id, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending', $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(record.user_id)
        .bind(record.kind.as_str())
        .bind(record.route_id)
        .bind(record.station_id)
        .bind(record.bus_id)
        .bind(record.fare)
        .bind(record.external_session_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error creating payment record: {}", e)))
    }

    async fn find_by_session_id(&self, session_id: &str) -> AppResult<Option<PaymentRecord>> {
        sqlx::query_as::<_, PaymentRecord>(
            "SELECT * FROM payments WHERE external_session_id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error finding payment record: {}", e)))
    }

    async fn mark_completed(&self, session_id: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE payments SET status = 'completed' WHERE external_session_id = $1 AND status = 'pending'",
        )
        .bind(session_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error completing payment record: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
