use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewTicket, Ticket};
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Falla con `Conflict` si el pago ya tiene ticket
    async fn create(&self, ticket: NewTicket) -> AppResult<Ticket>;
    async fn find_by_payment_intent(&self, payment_intent_id: &str) -> AppResult<Option<Ticket>>;
    /// Tickets del usuario, el más reciente primero
    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Ticket>>;
}

pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    async fn create(&self, ticket: NewTicket) -> AppResult<Ticket> {
        sqlx::query_as::<_, Ticket>(
            r#"
            INSERT INTO tickets (id, user_id, route_id, bus_id, start_station, end_station,
                                 price, payment_intent_id, expiry_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(ticket.user_id)
        .bind(ticket.route_id)
        .bind(ticket.bus_id)
        .bind(ticket.start_station)
        .bind(ticket.end_station)
        .bind(ticket.price)
        .bind(ticket.payment_intent_id)
        .bind(ticket.expiry_date)
        .bind(ticket.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Payment session has already been used".to_string())
            }
            _ => AppError::Database(format!("Error creating ticket: {}", e)),
        })
    }

    async fn find_by_payment_intent(&self, payment_intent_id: &str) -> AppResult<Option<Ticket>> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE payment_intent_id = $1")
            .bind(payment_intent_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error finding ticket by payment: {}", e)))
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Ticket>> {
        sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error listing tickets: {}", e)))
    }
}
