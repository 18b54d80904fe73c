use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Bus, NewBus};
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait BusRepository: Send + Sync {
    async fn create(&self, bus: NewBus) -> AppResult<Bus>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Bus>>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Bus>>;
    async fn find_all(&self, route_id: Option<Uuid>) -> AppResult<Vec<Bus>>;
    async fn update(&self, id: Uuid, bus: NewBus) -> AppResult<Option<Bus>>;
    /// Borra el bus; las estaciones asociadas quedan sin bus
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
    /// `true` si algún ticket apunta al bus
    async fn is_referenced(&self, id: Uuid) -> AppResult<bool>;
}

pub struct PgBusRepository {
    pool: PgPool,
}

impl PgBusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusRepository for PgBusRepository {
    async fn create(&self, bus: NewBus) -> AppResult<Bus> {
        sqlx::query_as::<_, Bus>(
            r#"
            INSERT INTO buses (id, name, route_id, capacity, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(bus.name)
        .bind(bus.route_id)
        .bind(bus.capacity)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error creating bus: {}", e)))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Bus>> {
        sqlx::query_as::<_, Bus>("SELECT * FROM buses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error finding bus: {}", e)))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Bus>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Bus>("SELECT * FROM buses WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error resolving buses: {}", e)))
    }

    async fn find_all(&self, route_id: Option<Uuid>) -> AppResult<Vec<Bus>> {
        sqlx::query_as::<_, Bus>(
            r#"
            SELECT * FROM buses
            WHERE ($1::uuid IS NULL OR route_id = $1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(route_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error listing buses: {}", e)))
    }

    async fn update(&self, id: Uuid, bus: NewBus) -> AppResult<Option<Bus>> {
        sqlx::query_as::<_, Bus>(
            r#"
            UPDATE buses
            SET name = $2, route_id = $3, capacity = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(bus.name)
        .bind(bus.route_id)
        .bind(bus.capacity)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error updating bus: {}", e)))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM buses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error deleting bus: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_referenced(&self, id: Uuid) -> AppResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM tickets WHERE bus_id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::Database(format!("Error checking bus references: {}", e)))?;

        Ok(result.0)
    }
}
