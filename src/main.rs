//! Gym Management API server entry point.

use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use gym_management::adapters::http::{app_router, AppState};
use gym_management::adapters::notification::{
    LoggingNotificationSender, ResendConfig, ResendNotificationSender,
};
use gym_management::adapters::{MemoryStore, PostgresStore};
use gym_management::application::{register_all, BillingPolicy, Dispatcher};
use gym_management::config::AppConfig;
use gym_management::ports::{NotificationSender, RepositoryScopeFactory};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn open_storage(config: &AppConfig) -> Result<Arc<dyn RepositoryScopeFactory>, BoxError> {
    if config.database.uses_memory_store() {
        tracing::warn!("No database URL configured, data is kept in memory only");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = PostgresStore::connect(&config.database).await?;
    if config.database.run_migrations {
        store.migrate().await?;
    }
    Ok(Arc::new(store))
}

fn notifier(config: &AppConfig) -> Arc<dyn NotificationSender> {
    if !config.email.is_enabled() {
        tracing::info!("No Resend API key configured, notifications are logged");
        return Arc::new(LoggingNotificationSender::new());
    }

    let resend = ResendConfig::new(config.email.resend_api_key.clone(), config.email.from_header())
        .with_base_url(config.email.api_base_url.clone());
    Arc::new(ResendNotificationSender::new(resend))
}

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config);

    let storage = open_storage(&config).await?;
    let billing = BillingPolicy::new(
        config.billing.currency()?,
        config.billing.tax_rate_basis_points,
    );

    let mut dispatcher = Dispatcher::new(storage);
    register_all(&mut dispatcher, notifier(&config), billing)?;
    tracing::info!(handlers = dispatcher.len(), "Dispatcher ready");

    let app = app_router(AppState::new(Arc::new(dispatcher)), &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Starting API server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}
