//! Homestead service binary.
//!
//! Owns the process lifecycle: the production scheduler is started once
//! here and stopped here, never from inside a handler.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `homestead.yaml` (or `HOMESTEAD_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Connect to `PostgreSQL` and run migrations
//! 4. Spawn the production scheduler
//! 5. Wait for Ctrl-C
//! 6. Stop the scheduler, rolling back any tick in flight, and close the pool

use std::path::PathBuf;

use homestead_core::config::{HomesteadConfig, LoggingConfig};
use homestead_core::scheduler::spawn_scheduler;
use homestead_db::{PgProductionSource, PostgresPool};
use homestead_engine::EngineError;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Config file read when `HOMESTEAD_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "homestead.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the database, or scheduler shutdown
/// fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    let (config, source) = load_config()?;
    init_logging(&config.logging);

    info!("homestead-engine starting");
    info!(
        source = %source,
        interval_secs = config.production.interval_secs,
        plot_capacity = config.production.plot_capacity,
        min_production_rate = config.production.min_production_rate,
        sell_price = config.economy.sell_price,
        "Configuration loaded"
    );

    let pool = PostgresPool::connect(&config.database).await?;
    pool.run_migrations().await?;

    let production = PgProductionSource::new(pool.clone(), &config.production);
    let scheduler = spawn_scheduler(production, config.production.interval());

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");

    let summary = scheduler.shutdown().await?;
    info!(
        ticks_run = summary.ticks_run,
        ticks_failed = summary.ticks_failed,
        ticks_interrupted = summary.ticks_interrupted,
        animals_produced = summary.animals_produced,
        "Production scheduler stopped"
    );

    pool.close().await;
    info!("homestead-engine stopped");
    Ok(())
}

/// Read the config file, falling back to defaults when the default path is
/// absent. An explicit `HOMESTEAD_CONFIG` must exist.
fn load_config() -> Result<(HomesteadConfig, String), EngineError> {
    if let Ok(path) = std::env::var("HOMESTEAD_CONFIG") {
        let config = HomesteadConfig::from_file(&PathBuf::from(&path))?;
        return Ok((config, path));
    }
    let path = PathBuf::from(DEFAULT_CONFIG_PATH);
    if path.exists() {
        return Ok((HomesteadConfig::from_file(&path)?, DEFAULT_CONFIG_PATH.to_owned()));
    }
    Ok((HomesteadConfig::from_env()?, "defaults".to_owned()))
}

fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
