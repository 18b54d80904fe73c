use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewStation, Station, StationFilter};
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait StationRepository: Send + Sync {
    async fn create(&self, station: NewStation) -> AppResult<Station>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Station>>;
    async fn find_all(&self, filter: StationFilter) -> AppResult<Vec<Station>>;
    async fn update(&self, id: Uuid, station: NewStation) -> AppResult<Option<Station>>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

pub struct PgStationRepository {
    pool: PgPool,
}

impl PgStationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StationRepository for PgStationRepository {
    async fn create(&self, station: NewStation) -> AppResult<Station> {
        sqlx::query_as::<_, Station>(
            r#"
            INSERT INTO stations (id, route_id, bus_id, name, latitude, longitude, fare, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(station.route_id)
        .bind(station.bus_id)
        .bind(station.name)
        .bind(station.latitude)
        .bind(station.longitude)
        .bind(station.fare)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error creating station: {}", e)))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Station>> {
        sqlx::query_as::<_, Station>("SELECT * FROM stations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error finding station: {}", e)))
    }

    async fn find_all(&self, filter: StationFilter) -> AppResult<Vec<Station>> {
        sqlx::query_as::<_, Station>(
            r#"
            SELECT * FROM stations
            WHERE ($1::uuid IS NULL OR route_id = $1)
              AND ($2::uuid IS NULL OR bus_id = $2)
            ORDER BY created_at ASC
            "#,
        )
        .bind(filter.route_id)
        .bind(filter.bus_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error listing stations: {}", e)))
    }

    async fn update(&self, id: Uuid, station: NewStation) -> AppResult<Option<Station>> {
        sqlx::query_as::<_, Station>(
            r#"
            UPDATE stations
            SET route_id = $2, bus_id = $3, name = $4, latitude = $5, longitude = $6, fare = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(station.route_id)
        .bind(station.bus_id)
        .bind(station.name)
        .bind(station.latitude)
        .bind(station.longitude)
        .bind(station.fare)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error updating station: {}", e)))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM stations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error deleting station: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
