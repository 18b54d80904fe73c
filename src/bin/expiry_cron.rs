//! Disparador diario de los recordatorios de vencimiento
//!
//! Proceso aparte del servidor: duerme hasta la hora configurada (hora
//! local), llama a `GET {APP_URL}/api/expiry-check` y registra la respuesta.

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use dotenvy::dotenv;
use std::env;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bus_pass_backend::services::expiry_notifier::next_daily_run;

const DEFAULT_CHECK_HOUR: u32 = 9;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app_url = env::var("APP_URL")
        .or_else(|_| env::var("NEXT_PUBLIC_APP_URL"))
        .context("APP_URL must be set")?;
    let endpoint = format!("{}/api/expiry-check", app_url.trim_end_matches('/'));

    let hour = match env::var("EXPIRY_CHECK_HOUR") {
        Ok(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|h| *h < 24)
            .ok_or_else(|| anyhow!("EXPIRY_CHECK_HOUR must be an hour between 0 and 23"))?,
        Err(_) => DEFAULT_CHECK_HOUR,
    };
    let run_on_start = env::var("EXPIRY_CHECK_ON_START")
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(120))
        .build()?;

    info!("⏰ Cron de vencimientos: {} cada día a las {:02}:00", endpoint, hour);

    if run_on_start {
        run_check(&client, &endpoint).await;
    }

    loop {
        let now = Local::now();
        let next = next_daily_run(&now, hour)
            .ok_or_else(|| anyhow!("No se pudo calcular la próxima ejecución"))?;
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        info!("💤 Próxima comprobación: {}", next.format("%Y-%m-%d %H:%M"));

        tokio::select! {
            _ = tokio::time::sleep(wait) => run_check(&client, &endpoint).await,
            _ = tokio::signal::ctrl_c() => {
                info!("🛑 Cron detenido");
                return Ok(());
            }
        }
    }
}

async fn run_check(client: &reqwest::Client, endpoint: &str) {
    info!("🔄 Ejecutando comprobación de vencimientos...");

    let response = match client.get(endpoint).send().await {
        Ok(response) => response,
        Err(e) => {
            error!("❌ Error llamando a {}: {}", endpoint, e);
            return;
        }
    };

    let status = response.status();
    match response.json::<serde_json::Value>().await {
        Ok(body) if status.is_success() => info!("✅ Resultado: {}", body),
        Ok(body) => error!("❌ La comprobación falló ({}): {}", status, body),
        Err(e) => error!("❌ Respuesta inválida ({}): {}", status, e),
    }
}
