//! Recordatorios de vencimiento de pases
//!
//! Busca los pases que vencen dentro de la ventana configurada (por defecto
//! 3 días, inclusive) y avisa a cada usuario por email. Un fallo individual
//! se registra y no corta el lote.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::models::{Pass, Route};
use crate::repositories::{PassRepository, RouteRepository};
use crate::services::email_service::{EmailMessage, EmailSender};
use crate::services::user_directory::{UserContact, UserDirectory};
use crate::utils::errors::AppResult;

pub const REMINDER_SUBJECT: &str = "Your Travel Pass is Expiring Soon";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpiryReport {
    pub checked: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct ExpiryNotifier {
    passes: Arc<dyn PassRepository>,
    routes: Arc<dyn RouteRepository>,
    users: Arc<dyn UserDirectory>,
    mailer: Arc<dyn EmailSender>,
    window: Duration,
}

impl ExpiryNotifier {
    pub fn new(
        passes: Arc<dyn PassRepository>,
        routes: Arc<dyn RouteRepository>,
        users: Arc<dyn UserDirectory>,
        mailer: Arc<dyn EmailSender>,
        window_days: i64,
    ) -> Self {
        Self {
            passes,
            routes,
            users,
            mailer,
            window: Duration::days(window_days),
        }
    }

    pub async fn run(&self, now: DateTime<Utc>) -> AppResult<ExpiryReport> {
        info!("🔄 Buscando pases que vencen antes de {}", now + self.window);

        let expiring = self.passes.find_expiring_between(now, now + self.window).await?;
        let mut report = ExpiryReport {
            checked: expiring.len(),
            ..ExpiryReport::default()
        };
        if expiring.is_empty() {
            info!("✅ No hay pases por vencer");
            return Ok(report);
        }

        let route_ids: Vec<_> = expiring.iter().map(|p| p.route_id).collect();
        let routes: HashMap<_, _> = self
            .routes
            .find_by_ids(&route_ids)
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        for pass in &expiring {
            let contact = match self.users.lookup(&pass.user_id).await {
                Ok(Some(contact)) => contact,
                Ok(None) => {
                    warn!("⚠️ Usuario {} sin email, se omite el pase {}", pass.user_id, pass.id);
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    error!("❌ No se pudo resolver el usuario {}: {}", pass.user_id, e);
                    report.failed += 1;
                    continue;
                }
            };

            let message = reminder_message(&contact, pass, routes.get(&pass.route_id));
            info!("📩 Enviando recordatorio a {} (pase {})", contact.email, pass.id);

            match self.mailer.send(&message).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    error!("❌ Error enviando email a {}: {}", contact.email, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "📊 Recordatorios: {} revisados, {} enviados, {} omitidos, {} fallidos",
            report.checked, report.sent, report.skipped, report.failed
        );
        Ok(report)
    }
}

pub fn reminder_message(contact: &UserContact, pass: &Pass, route: Option<&Route>) -> EmailMessage {
    let name = contact.first_name.as_deref().unwrap_or("User");
    let route_part = route
        .map(|r| format!(" for route {}", r.label()))
        .unwrap_or_default();

    EmailMessage {
        to: contact.email.clone(),
        subject: REMINDER_SUBJECT.to_string(),
        text: format!(
            "Hello {},\n\nYour travel pass{} will expire on {}. Renew now!\n\nThanks, Your Transport Service.",
            name,
            route_part,
            pass.expiry_date.format("%a %b %d %Y")
        ),
    }
}

/// Próxima ejecución diaria a la hora `hour` estrictamente posterior a `now`.
///
/// Si la hora no existe ese día (cambio de horario) se pasa al día siguiente.
pub fn next_daily_run<Tz: TimeZone>(now: &DateTime<Tz>, hour: u32) -> Option<DateTime<Tz>> {
    let tz = now.timezone();
    let mut date = now.date_naive();

    for _ in 0..3 {
        if let Some(candidate) = date
            .and_hms_opt(hour, 0, 0)
            .and_then(|naive| tz.from_local_datetime(&naive).earliest())
        {
            if candidate > *now {
                return Some(candidate);
            }
        }
        date = date.succ_opt()?;
    }
    None
}
