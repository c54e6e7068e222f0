//! sendgate-rs: Send quota and account gating service

use sendgate_rs::api::ApiServer;
use sendgate_rs::config::{Config, LoggingConfig};
use sendgate_rs::limiter::SendLimiter;
use sendgate_rs::settings::SettingsManager;
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first so the log format can honor it
    let config = if std::path::Path::new("config.toml").exists() {
        Config::from_file("config.toml")?
    } else {
        Config::default()
    };

    init_tracing(&config.logging);

    info!("Starting sendgate-rs v{}", env!("CARGO_PKG_VERSION"));
    info!("  API listening on: {}", config.server.listen_addr);
    info!("  Database: {}", config.database.url);
    info!(
        "  Quota: {} sends per {}h window, {} day retention",
        config.quota.send_limit, config.quota.window_hours, config.quota.retention_days
    );

    // Connect to the database and ensure tables exist
    let db = SqlitePool::connect(&config.database.url).await?;

    let settings = SettingsManager::new(db.clone());
    settings.init_db().await?;

    let limiter = SendLimiter::new(db.clone(), &config.quota);
    limiter.init_db().await?;

    // Hourly retention sweep; the first tick fires immediately so stale
    // rows from a long downtime are cleared at startup
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600));
        loop {
            interval.tick().await;
            if let Err(e) = limiter.prune_expired().await {
                error!("Retention sweep failed: {}", e);
            }
        }
    });

    // Run the API server
    let server = ApiServer::new(db, &config);
    server.run().await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "sendgate_rs={},tower_http=info",
            logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
