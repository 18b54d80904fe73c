use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use bus_pass_backend::config::{DatabaseConfig, EnvironmentConfig};
use bus_pass_backend::database::connection::mask_database_url;
use bus_pass_backend::database::DatabaseConnection;
use bus_pass_backend::repositories::Repositories;
use bus_pass_backend::routes::create_app;
use bus_pass_backend::services::{ClerkUserDirectory, ResendEmailSender, StripeGateway};
use bus_pass_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚌 Bus Pass Backend - Pases y tickets");
    info!("====================================");

    let config = EnvironmentConfig::from_env()?;
    if config.is_development() {
        info!("🧪 Modo desarrollo");
    }

    // Inicializar base de datos
    let db_config = DatabaseConfig::new(config.database_url.clone());
    let pool = match DatabaseConnection::global(&db_config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a {}: {}", mask_database_url(&config.database_url), e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    DatabaseConnection::run_migrations(pool).await?;

    // Colaboradores externos
    let timeout = Duration::from_secs(config.http_timeout_secs);
    let gateway = StripeGateway::new(
        config.stripe_secret_key.clone(),
        config.stripe_api_base.clone(),
        config.payment_currency.clone(),
        timeout,
    )?;
    if config.resend_api_key.is_none() {
        warn!("⚠️ RESEND_API_KEY no configurada: los recordatorios fallarán");
    }
    let mailer = ResendEmailSender::new(config.resend_api_key.clone(), config.from_email.clone(), timeout)?;
    let users = ClerkUserDirectory::new(
        config.clerk_secret_key.clone(),
        config.clerk_api_base.clone(),
        timeout,
    )?;

    let addr: SocketAddr = config.server_url().parse()?;
    let state = AppState::new(
        config,
        Repositories::postgres(pool.clone()),
        Arc::new(gateway),
        Arc::new(mailer),
        Arc::new(users),
    );
    let app = create_app(state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🛣️ Flota:");
    info!("   GET|POST|PUT|DELETE /api/routes - Rutas");
    info!("   GET|POST|PUT|DELETE /api/buses - Buses (?routeId=)");
    info!("   GET|POST|PUT|DELETE /api/stations - Estaciones (?routeId=&busId=)");
    info!("🎫 Pases y tickets:");
    info!("   POST /api/payment-session - Crear sesión de pago");
    info!("   GET  /api/pass?userId= - Pase activo");
    info!("   POST /api/pass - Confirmar compra de pase");
    info!("   GET  /api/tickets?userId= - Listar tickets");
    info!("   POST /api/tickets - Emitir ticket");
    info!("   GET  /api/pass-usage?userId= - Historial de escaneos");
    info!("   POST /api/pass-usage - Registrar escaneo");
    info!("📩 GET  /api/expiry-check - Recordatorios de vencimiento");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal SIGTERM recibida, apagando servidor...");
        },
    }
}
