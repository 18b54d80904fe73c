use chrono::Utc;
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

use crate::controllers::route_index;
use crate::dto::common::{ApiResponse, RouteSummary};
use crate::dto::pass_usage_dto::{PassUsageResponse, RecordScanRequest, UsagePassSummary};
use crate::models::{NewPassUsage, PassUsage};
use crate::repositories::{PassRepository, PassUsageRepository, Repositories, RouteRepository};
use crate::utils::errors::AppError;
use crate::utils::validation::{parse_id, require_user_id};

pub struct PassUsageController {
    usages: Arc<dyn PassUsageRepository>,
    passes: Arc<dyn PassRepository>,
    routes: Arc<dyn RouteRepository>,
}

impl PassUsageController {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            usages: repos.usages.clone(),
            passes: repos.passes.clone(),
            routes: repos.routes.clone(),
        }
    }

    /// Validar un pase en el punto de control y registrar el escaneo
    pub async fn record_scan(
        &self,
        request: RecordScanRequest,
    ) -> Result<ApiResponse<PassUsage>, AppError> {
        request.validate()?;
        let user_id = request.user_id.trim().to_string();
        let pass_id = parse_id("passId", &request.pass_id)?;
        let now = Utc::now();

        let pass = self.passes.find_by_id(pass_id).await?;
        let valid = pass
            .as_ref()
            .is_some_and(|p| p.user_id == user_id && p.is_active_at(now));
        if !valid {
            warn!("⚠️ Escaneo rechazado: pase {} de {}", pass_id, user_id);
            return Err(AppError::PassExpiredOrInvalid("Pass is expired or invalid".to_string()));
        }

        let location = request
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        let usage = self
            .usages
            .append(NewPassUsage {
                user_id,
                pass_id,
                scanned_at: now,
                location,
            })
            .await?;

        info!("✅ Pase {} verificado ({:?})", usage.pass_id, usage.location);
        Ok(ApiResponse::success_with_message(usage, "Pass verified successfully"))
    }

    /// Historial de escaneos, más recientes primero, con pase y ruta resueltos
    pub async fn get_history(&self, user_id: Option<&str>) -> Result<Vec<PassUsageResponse>, AppError> {
        let user_id = require_user_id(user_id)?;
        let usages = self.usages.find_by_user(&user_id).await?;

        let mut pass_ids: Vec<_> = usages.iter().map(|u| u.pass_id).collect();
        pass_ids.sort_unstable();
        pass_ids.dedup();
        let passes: HashMap<_, _> = if pass_ids.is_empty() {
            HashMap::new()
        } else {
            self.passes
                .find_by_ids(&pass_ids)
                .await?
                .into_iter()
                .map(|p| (p.id, p))
                .collect()
        };
        let routes = route_index(self.routes.as_ref(), passes.values().map(|p| p.route_id)).await?;

        Ok(usages
            .into_iter()
            .map(|usage| {
                let pass = passes.get(&usage.pass_id).map(|p| UsagePassSummary {
                    id: p.id,
                    expiry_date: p.expiry_date,
                    route: routes.get(&p.route_id).map(RouteSummary::from),
                });
                PassUsageResponse::new(usage, pass)
            })
            .collect())
    }
}
