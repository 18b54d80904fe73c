use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewPass, Pass};
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait PassRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Pass>>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Pass>>;
    /// Pase con `expiry_date >= now`; si hubiera varios, el de vencimiento más lejano
    async fn find_active_for_user(&self, user_id: &str, now: DateTime<Utc>) -> AppResult<Option<Pass>>;
    /// Inserta el pase salvo que el usuario ya tenga uno activo en
    /// `new.purchase_date`. Comprobación e inserción son atómicas por usuario.
    async fn create_if_none_active(&self, new: NewPass) -> AppResult<Option<Pass>>;
    /// Pases con `from <= expiry_date <= to`
    async fn find_expiring_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<Vec<Pass>>;
}

pub struct PgPassRepository {
    pool: PgPool,
}

impl PgPassRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PassRepository for PgPassRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Pass>> {
        sqlx::query_as::<_, Pass>("SELECT * FROM passes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error finding pass: {}", e)))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Pass>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Pass>("SELECT * FROM passes WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error resolving passes: {}", e)))
    }

    async fn find_active_for_user(&self, user_id: &str, now: DateTime<Utc>) -> AppResult<Option<Pass>> {
        sqlx::query_as::<_, Pass>(
            r#"
            SELECT * FROM passes
            WHERE user_id = $1 AND expiry_date >= $2
            ORDER BY expiry_date DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error finding active pass: {}", e)))
    }

    async fn create_if_none_active(&self, new: NewPass) -> AppResult<Option<Pass>> {
        let mut tx = self.pool.begin().await?;

        // Serializa las confirmaciones concurrentes del mismo usuario
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&new.user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("Error locking user passes: {}", e)))?;

        let existing: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM passes WHERE user_id = $1 AND expiry_date >= $2 LIMIT 1",
        )
        .bind(&new.user_id)
        .bind(new.purchase_date)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::Database(format!("Error checking active pass: {}", e)))?;

        if existing.is_some() {
            tx.rollback().await?;
            return Ok(None);
        }

        let pass = sqlx::query_as::<_, Pass>(
            r#"
            INSERT INTO passes (id, user_id, route_id, fare, purchase_date, expiry_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.user_id)
        .bind(new.route_id)
        .bind(new.fare)
        .bind(new.purchase_date)
        .bind(new.expiry_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::Database(format!("Error creating pass: {}", e)))?;

        tx.commit().await?;
        Ok(Some(pass))
    }

    async fn find_expiring_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<Vec<Pass>> {
        sqlx::query_as::<_, Pass>(
            r#"
            SELECT * FROM passes
            WHERE expiry_date >= $1 AND expiry_date <= $2
            ORDER BY expiry_date ASC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error listing expiring passes: {}", e)))
    }
}
