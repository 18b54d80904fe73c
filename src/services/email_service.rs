//! Envío de emails
//!
//! Colaborador externo usado por los recordatorios de vencimiento.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> AppResult<()>;
}

/// Cliente de la API de Resend
pub struct ResendEmailSender {
    api_key: Option<String>,
    from: String,
    api_base: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl ResendEmailSender {
    pub fn new(api_key: Option<String>, from: String, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            from,
            api_base: "https://api.resend.com".to_string(),
            client,
        })
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::ExternalApi("RESEND_API_KEY is not configured".to_string()))?;

        let response = self
            .client
            .post(format!("{}/emails", self.api_base))
            .bearer_auth(api_key)
            .json(&ResendPayload {
                from: &self.from,
                to: &message.to,
                subject: &message.subject,
                text: &message.text,
            })
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Email request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Email provider responded {}: {}",
                status, error_text
            )));
        }

        Ok(())
    }
}

/// Guarda los mensajes en memoria en lugar de enviarlos.
/// Los destinatarios en `failing` devuelven error.
#[derive(Default)]
pub struct RecordingEmailSender {
    sent: RwLock<Vec<EmailMessage>>,
    failing: Vec<String>,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(addresses: &[&str]) -> Self {
        Self {
            sent: RwLock::new(Vec::new()),
            failing: addresses.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        if self.failing.iter().any(|a| a == &message.to) {
            return Err(AppError::ExternalApi(format!("mailbox {} rejected", message.to)));
        }
        self.sent.write().await.push(message.clone());
        Ok(())
    }
}
