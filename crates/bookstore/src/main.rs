use anyhow::{Context, Result};
use bookstore::{handler::AppRouter, state::AppState};
use dotenv::dotenv;
use shared::{
    config::{Config, ConnectionManager},
    utils::{Telemetry, init_logger, run_metrics_collector},
};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let is_dev = std::env::var("DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    let is_enable_file = std::env::var("ENABLE_FILE_LOG")
        .map(|v| v == "true")
        .unwrap_or(false);

    let config = Config::init().context("Failed to load configuration")?;

    let mut telemetry = Telemetry::new("bookstore", config.otel_endpoint.clone());
    let logger_provider = telemetry.init_logger()?;
    telemetry.init_tracer()?;

    init_logger(&logger_provider, "bookstore", is_dev, is_enable_file);

    let pool = ConnectionManager::new_pool(
        &config.database_url,
        config.db_min_conn,
        config.db_max_conn,
    )
    .await
    .context("Failed to initialize database pool")?;

    if config.run_migrations {
        info!("Running migrations...");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;
        info!("Migrations completed successfully");
    }

    let state = Arc::new(AppState::new(pool, &config).context("Failed to create AppState")?);

    tokio::spawn(run_metrics_collector(state.system_metrics.clone()));

    let scheduler = state.di_container.scheduler.clone().start();

    let served = AppRouter::serve(config.port, state).await;

    info!("Shutting down...");
    scheduler.stop().await;

    if let Err(err) = telemetry.shutdown() {
        error!("❌ Telemetry shutdown failed: {err:?}");
    }

    served.context("Failed to start server")
}
