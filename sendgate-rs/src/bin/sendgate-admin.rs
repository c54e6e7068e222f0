//! CLI tool for operating the send gate
//!
//! Works directly against the database, so it does not need the API
//! server to be running.
//!
//! # Usage
//!
//! ```bash
//! # Show a user's quota standing
//! sendgate-admin stats user-42
//!
//! # Pause / resume a user
//! sendgate-admin pause user-42
//! sendgate-admin resume user-42
//!
//! # Switch application mode
//! sendgate-admin mode user-42 AUTO
//!
//! # Delete send records past retention
//! sendgate-admin prune
//!
//! # Mint a bearer token for testing
//! sendgate-admin token user-42 --admin
//! ```

use clap::{Parser, Subcommand};
use sendgate_rs::api::auth::JwtConfig;
use sendgate_rs::config::Config;
use sendgate_rs::limiter::SendLimiter;
use sendgate_rs::settings::SettingsManager;
use sqlx::SqlitePool;

#[derive(Parser)]
#[command(name = "sendgate-admin")]
#[command(about = "Operate the send gate database", long_about = None)]
struct Cli {
    /// Config file path (defaults are used when it does not exist)
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Database URL override (e.g., sqlite://sendgate.db)
    #[arg(short, long)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a user's quota standing
    Stats {
        /// User id
        user_id: String,
    },
    /// Pause a user's account
    Pause {
        /// User id
        user_id: String,
    },
    /// Resume a paused account
    Resume {
        /// User id
        user_id: String,
    },
    /// Set a user's application mode
    Mode {
        /// User id
        user_id: String,
        /// MANUAL or AUTO
        mode: String,
    },
    /// Delete send records past retention
    Prune,
    /// Mint a bearer token for testing
    Token {
        /// User id
        user_id: String,
        /// Include the admin claim
        #[arg(long)]
        admin: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = if std::path::Path::new(&cli.config).exists() {
        Config::from_file(&cli.config)?
    } else {
        Config::default()
    };
    if let Some(db) = cli.db {
        config.database.url = db;
    }

    let db = SqlitePool::connect(&config.database.url).await?;

    let settings = SettingsManager::new(db.clone());
    settings.init_db().await?;

    let limiter = SendLimiter::new(db, &config.quota);
    limiter.init_db().await?;

    match cli.command {
        Commands::Stats { user_id } => {
            let stats = limiter.get_send_stats(&user_id).await?;

            println!("Send stats for {}:", user_id);
            println!("  Used:      {}", stats.used);
            println!("  Limit:     {}", stats.limit);
            println!("  Remaining: {}", stats.remaining);
            println!("  Allowed:   {}", if stats.allowed { "yes" } else { "no" });
            println!("  Resets at: {}", stats.window_reset_at.to_rfc3339());
        }
        Commands::Pause { user_id } => {
            settings.set_account_status(&user_id, "paused").await?;
            println!("✓ User {} paused", user_id);
        }
        Commands::Resume { user_id } => {
            settings.set_account_status(&user_id, "active").await?;
            println!("✓ User {} resumed", user_id);
        }
        Commands::Mode { user_id, mode } => {
            let updated = settings.set_application_mode(&user_id, &mode).await?;
            println!(
                "✓ Application mode for {} set to {}",
                user_id,
                updated.application_mode.as_str()
            );
        }
        Commands::Prune => {
            let pruned = limiter.prune_expired().await?;
            println!("✓ Pruned {} send record(s)", pruned);
        }
        Commands::Token { user_id, admin } => {
            let jwt = JwtConfig::new(
                config.auth.jwt_secret.clone(),
                config.auth.token_expiry_hours,
            );
            let token = jwt.create_token(&user_id, admin)?;
            println!("{}", token);
        }
    }

    Ok(())
}
