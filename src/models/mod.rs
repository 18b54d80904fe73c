//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean exactamente
//! al schema PostgreSQL. Las referencias entre colecciones son solo ids;
//! la resolución (populate) la hace la capa de consulta.

pub mod bus;
pub mod pass;
pub mod pass_usage;
pub mod payment;
pub mod route;
pub mod station;
pub mod ticket;

pub use bus::{Bus, NewBus};
pub use pass::{NewPass, Pass};
pub use pass_usage::{NewPassUsage, PassUsage};
pub use payment::{NewPaymentRecord, PaymentKind, PaymentRecord, PaymentStatus};
pub use route::{NewRoute, Route};
pub use station::{NewStation, Station, StationFilter};
pub use ticket::{NewTicket, Ticket};
