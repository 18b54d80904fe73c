use chrono::Utc;

use crate::dto::expiry_dto::ExpiryCheckResponse;
use crate::services::ExpiryNotifier;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct ExpiryController {
    notifier: ExpiryNotifier,
}

impl ExpiryController {
    pub fn new(state: &AppState) -> Self {
        Self {
            notifier: ExpiryNotifier::new(
                state.repos.passes.clone(),
                state.repos.routes.clone(),
                state.users.clone(),
                state.mailer.clone(),
                state.config.expiry_reminder_days,
            ),
        }
    }

    pub async fn run_check(&self) -> Result<ExpiryCheckResponse, AppError> {
        let report = self.notifier.run(Utc::now()).await?;
        Ok(ExpiryCheckResponse {
            message: "Expiry check completed".to_string(),
            report,
        })
    }
}
