//! Settings manager - resolves and mutates per-user settings rows

use crate::error::{GateError, Result};
use crate::settings::types::{AccountStatus, ApplicationMode, UserSettings};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Manages the `user_settings` table.
///
/// Reads never create rows; a missing row resolves to defaults. Writes
/// upsert, so pausing a user who has never touched their settings works
/// without a seeding step.
pub struct SettingsManager {
    db: SqlitePool,
}

impl SettingsManager {
    /// Create a new settings manager
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Initialize database tables
    pub async fn init_db(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_settings (
                user_id TEXT PRIMARY KEY,
                application_mode TEXT NOT NULL DEFAULT 'MANUAL',
                account_status TEXT NOT NULL DEFAULT 'active',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Get the stored settings row for a user, if one exists.
    ///
    /// Never writes; reading a user with no row returns `None`.
    pub async fn get_settings(&self, user_id: &str) -> Result<Option<UserSettings>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, application_mode, account_status, created_at, updated_at
            FROM user_settings
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        if let Some(row) = row {
            Ok(Some(self.row_to_settings(row)?))
        } else {
            Ok(None)
        }
    }

    /// Stored settings, or the defaults (`MANUAL`, `active`) when no row
    /// exists. This is the read path used by the send limiter; it performs
    /// no writes.
    pub async fn resolve_or_default(&self, user_id: &str) -> Result<UserSettings> {
        Ok(self
            .get_settings(user_id)
            .await?
            .unwrap_or_else(|| UserSettings::defaults_for(user_id)))
    }

    /// Set a user's account status.
    ///
    /// `new_status` must be exactly `active` or `paused`; anything else
    /// fails with `InvalidArgument` and mutates nothing. A user with no
    /// settings row gets one created with defaults plus the new status.
    pub async fn set_account_status(&self, user_id: &str, new_status: &str) -> Result<UserSettings> {
        let status = AccountStatus::parse(new_status).ok_or_else(|| {
            GateError::InvalidArgument(format!("invalid account status: {}", new_status))
        })?;

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO user_settings (user_id, application_mode, account_status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                account_status = excluded.account_status,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(ApplicationMode::default().as_str())
        .bind(status.as_str())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.db)
        .await?;

        info!("Account status for {} set to {}", user_id, status.as_str());

        self.get_settings(user_id)
            .await?
            .ok_or_else(|| GateError::NotFound("Failed to retrieve updated settings".to_string()))
    }

    /// Set a user's application mode (`MANUAL` or `AUTO`), with the same
    /// validate-then-upsert contract as the status gate.
    pub async fn set_application_mode(&self, user_id: &str, new_mode: &str) -> Result<UserSettings> {
        let mode = ApplicationMode::parse(new_mode).ok_or_else(|| {
            GateError::InvalidArgument(format!("invalid application mode: {}", new_mode))
        })?;

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO user_settings (user_id, application_mode, account_status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                application_mode = excluded.application_mode,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(mode.as_str())
        .bind(AccountStatus::default().as_str())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.db)
        .await?;

        debug!("Application mode for {} set to {}", user_id, mode.as_str());

        self.get_settings(user_id)
            .await?
            .ok_or_else(|| GateError::NotFound("Failed to retrieve updated settings".to_string()))
    }

    /// Count stored settings rows (for the admin overview)
    pub async fn count_settings(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_settings")
            .fetch_one(&self.db)
            .await?;

        Ok(count.0)
    }

    /// Count users currently paused
    pub async fn count_paused(&self) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM user_settings WHERE account_status = ?")
                .bind(AccountStatus::Paused.as_str())
                .fetch_one(&self.db)
                .await?;

        Ok(count.0)
    }

    /// Helper: Convert database row to UserSettings
    fn row_to_settings(&self, row: sqlx::sqlite::SqliteRow) -> Result<UserSettings> {
        use sqlx::Row;

        let mode_str: String = row.try_get("application_mode")?;
        let status_str: String = row.try_get("account_status")?;
        let created_at_str: String = row.try_get("created_at")?;
        let updated_at_str: String = row.try_get("updated_at")?;

        Ok(UserSettings {
            user_id: row.try_get("user_id")?,
            application_mode: ApplicationMode::parse(&mode_str).ok_or_else(|| {
                GateError::Parse(format!("stored application mode: {}", mode_str))
            })?,
            account_status: AccountStatus::parse(&status_str)
                .ok_or_else(|| GateError::Parse(format!("stored account status: {}", status_str)))?,
            created_at: parse_timestamp(&created_at_str)?,
            updated_at: parse_timestamp(&updated_at_str)?,
        })
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| GateError::Parse(e.to_string()))
}
