//! sendgate-rs: Send quota and account gating service
//!
//! Tracks application sends per user over a rolling window and answers
//! whether the next send is allowed, folding in the account's
//! active/paused status.
//!
//! # Features
//!
//! - **Rolling window**: usage is derived from recorded sends at query
//!   time, so there is no scheduled counter reset to get wrong
//! - **Account gating**: a paused account is denied regardless of
//!   remaining quota
//! - **REST API**: axum endpoints behind JWT bearer authentication
//! - **Storage**: SQLite via sqlx, single-file deployment
//!
//! # Example
//!
//! ```no_run
//! use sendgate_rs::api::ApiServer;
//! use sendgate_rs::config::Config;
//! use sendgate_rs::limiter::SendLimiter;
//! use sendgate_rs::settings::SettingsManager;
//! use sqlx::SqlitePool;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let db = SqlitePool::connect(&config.database.url).await?;
//!
//!     SettingsManager::new(db.clone()).init_db().await?;
//!     SendLimiter::new(db.clone(), &config.quota).init_db().await?;
//!
//!     let server = ApiServer::new(db, &config);
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`limiter`]: Send recording and quota computation
//! - [`settings`]: Per-user application mode and account status
//! - [`api`]: REST API server

pub mod api;
pub mod config;
pub mod error;
pub mod limiter;
pub mod settings;

// Re-export commonly used types
pub use config::Config;
pub use error::{GateError, Result};
