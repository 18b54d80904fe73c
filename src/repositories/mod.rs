//! Repositorios
//!
//! Un trait por colección con implementación PostgreSQL, más `InMemoryStore`
//! que implementa todos. Las referencias se resuelven con `find_by_ids`
//! desde los controllers; ningún repositorio hace joins implícitos.

pub mod bus_repository;
pub mod memory;
pub mod pass_repository;
pub mod pass_usage_repository;
pub mod payment_repository;
pub mod route_repository;
pub mod station_repository;
pub mod ticket_repository;

use sqlx::PgPool;
use std::sync::Arc;

pub use bus_repository::{BusRepository, PgBusRepository};
pub use memory::InMemoryStore;
pub use pass_repository::{PassRepository, PgPassRepository};
pub use pass_usage_repository::{PassUsageRepository, PgPassUsageRepository};
pub use payment_repository::{PaymentRepository, PgPaymentRepository};
pub use route_repository::{PgRouteRepository, RouteRepository};
pub use station_repository::{PgStationRepository, StationRepository};
pub use ticket_repository::{PgTicketRepository, TicketRepository};

/// Conjunto de repositorios que comparte el estado de la aplicación
#[derive(Clone)]
pub struct Repositories {
    pub routes: Arc<dyn RouteRepository>,
    pub buses: Arc<dyn BusRepository>,
    pub stations: Arc<dyn StationRepository>,
    pub passes: Arc<dyn PassRepository>,
    pub tickets: Arc<dyn TicketRepository>,
    pub usages: Arc<dyn PassUsageRepository>,
    pub payments: Arc<dyn PaymentRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            routes: Arc::new(PgRouteRepository::new(pool.clone())),
            buses: Arc::new(PgBusRepository::new(pool.clone())),
            stations: Arc::new(PgStationRepository::new(pool.clone())),
            passes: Arc::new(PgPassRepository::new(pool.clone())),
            tickets: Arc::new(PgTicketRepository::new(pool.clone())),
            usages: Arc::new(PgPassUsageRepository::new(pool.clone())),
            payments: Arc::new(PgPaymentRepository::new(pool)),
        }
    }

    pub fn in_memory(store: InMemoryStore) -> Self {
        Self {
            routes: Arc::new(store.clone()),
            buses: Arc::new(store.clone()),
            stations: Arc::new(store.clone()),
            passes: Arc::new(store.clone()),
            tickets: Arc::new(store.clone()),
            usages: Arc::new(store.clone()),
            payments: Arc::new(store),
        }
    }
}
