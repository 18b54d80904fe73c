//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Todos los colaboradores van detrás de
//! `Arc<dyn Trait>` para poder sustituirlos en tests.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::Repositories;
use crate::services::{EmailSender, PaymentGateway, UserDirectory};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub repos: Repositories,
    pub gateway: Arc<dyn PaymentGateway>,
    pub mailer: Arc<dyn EmailSender>,
    pub users: Arc<dyn UserDirectory>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        repos: Repositories,
        gateway: Arc<dyn PaymentGateway>,
        mailer: Arc<dyn EmailSender>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            repos,
            gateway,
            mailer,
            users,
        }
    }
}
