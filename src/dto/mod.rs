//! DTOs de la API
//!
//! Cuerpos de request/response en camelCase. Las referencias (ruta, bus,
//! pase) se devuelven resueltas como resúmenes.

pub mod bus_dto;
pub mod common;
pub mod expiry_dto;
pub mod pass_dto;
pub mod pass_usage_dto;
pub mod payment_dto;
pub mod route_dto;
pub mod station_dto;
pub mod ticket_dto;

pub use bus_dto::*;
pub use common::*;
pub use expiry_dto::*;
pub use pass_dto::*;
pub use pass_usage_dto::*;
pub use payment_dto::*;
pub use route_dto::*;
pub use station_dto::*;
pub use ticket_dto::*;
