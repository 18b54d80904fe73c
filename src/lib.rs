//! Backend de pases y tickets de autobús
//!
//! Rutas, buses y estaciones como datos de referencia; pases mensuales y
//! tickets de un viaje emitidos tras confirmar el pago en la pasarela;
//! registro de escaneos y recordatorios de vencimiento.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
