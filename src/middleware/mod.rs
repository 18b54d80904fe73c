//! Middleware del sistema
//!
//! CORS; el tracing de requests lo añade `routes::create_app`.

pub mod cors;

pub use cors::*;
