use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewRoute, Route};
use crate::utils::errors::{AppError, AppResult};

/// Catálogo de rutas
#[async_trait]
pub trait RouteRepository: Send + Sync {
    async fn create(&self, route: NewRoute) -> AppResult<Route>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Route>>;
    /// Resolución por lote para el populate de buses, estaciones, pases...
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Route>>;
    async fn find_all(&self) -> AppResult<Vec<Route>>;
    async fn update(&self, id: Uuid, route: NewRoute) -> AppResult<Option<Route>>;
    /// Borra la ruta junto con sus buses y estaciones
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
    /// `true` si algún pase, ticket o pago apunta a la ruta o a uno de sus buses
    async fn is_referenced(&self, id: Uuid) -> AppResult<bool>;
}

pub struct PgRouteRepository {
    pool: PgPool,
}

impl PgRouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RouteRepository for PgRouteRepository {
    async fn create(&self, route: NewRoute) -> AppResult<Route> {
        sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO routes (id, start_location, end_location, fare, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(route.start)
        .bind(route.end)
        .bind(route.fare)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error creating route: {}", e)))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Route>> {
        sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error finding route: {}", e)))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Route>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error resolving routes: {}", e)))
    }

    async fn find_all(&self) -> AppResult<Vec<Route>> {
        sqlx::query_as::<_, Route>("SELECT * FROM routes ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error listing routes: {}", e)))
    }

    async fn update(&self, id: Uuid, route: NewRoute) -> AppResult<Option<Route>> {
        sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET start_location = $2, end_location = $3, fare = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(route.start)
        .bind(route.end)
        .bind(route.fare)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error updating route: {}", e)))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM routes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error deleting route: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_referenced(&self, id: Uuid) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(SELECT 1 FROM passes WHERE route_id = $1)
                OR EXISTS(SELECT 1 FROM tickets WHERE route_id = $1)
                OR EXISTS(
                    SELECT 1 FROM tickets t JOIN buses b ON b.id = t.bus_id
                    WHERE b.route_id = $1
                )
                OR EXISTS(SELECT 1 FROM payments WHERE route_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error checking route references: {}", e)))?;

        Ok(result.0)
    }
}
