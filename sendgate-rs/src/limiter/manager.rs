//! Send limiter - records sends and computes rolling-window quota standing

use crate::config::QuotaConfig;
use crate::error::{GateError, Result};
use crate::limiter::types::{SendRecord, SendStats, SendWindow};
use crate::settings::SettingsManager;
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

/// Records application sends and answers quota queries.
///
/// Usage is always derived from the stored rows at query time. Recording
/// does not check the quota; enforcement happens at the API layer by
/// consulting [`SendStats::allowed`] before acting.
pub struct SendLimiter {
    db: SqlitePool,
    settings: SettingsManager,
    limit: u32,
    window: SendWindow,
    retention: Duration,
}

impl SendLimiter {
    /// Create a new send limiter
    pub fn new(db: SqlitePool, quota: &QuotaConfig) -> Self {
        let window = SendWindow::from_hours(quota.window_hours);
        // Pruning must never reach into the live window
        let retention = Duration::days(quota.retention_days).max(window.duration());

        Self {
            settings: SettingsManager::new(db.clone()),
            db,
            limit: quota.send_limit,
            window,
            retention,
        }
    }

    /// Initialize database tables
    pub async fn init_db(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS send_records (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                sent_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_send_records_user_sent
             ON send_records (user_id, sent_at)",
        )
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Current quota standing for a user
    pub async fn get_send_stats(&self, user_id: &str) -> Result<SendStats> {
        self.send_stats_at(user_id, Utc::now()).await
    }

    /// Quota standing with the window pinned at `now`.
    ///
    /// A single `now` is captured per query so used/remaining/reset all
    /// describe the same window.
    pub(crate) async fn send_stats_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<SendStats> {
        let settings = self.settings.resolve_or_default(user_id).await?;
        let (used, oldest) = self.window_usage(user_id, now).await?;
        let reset_at = self.window.reset_at(oldest, now);

        Ok(SendStats::compute(
            used,
            self.limit,
            settings.is_active(),
            reset_at,
        ))
    }

    /// Record one send for a user.
    ///
    /// Always inserts; callers that care about the quota check
    /// [`SendStats::allowed`] first.
    pub async fn record_send(&self, user_id: &str) -> Result<SendRecord> {
        if user_id.is_empty() {
            return Err(GateError::InvalidArgument("empty user id".to_string()));
        }

        let record = SendRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            sent_at: Utc::now(),
        };

        sqlx::query("INSERT INTO send_records (id, user_id, sent_at) VALUES (?, ?, ?)")
            .bind(&record.id)
            .bind(&record.user_id)
            .bind(record.sent_at.to_rfc3339())
            .execute(&self.db)
            .await?;

        debug!("Recorded send {} for {}", record.id, record.user_id);

        Ok(record)
    }

    /// Count and oldest timestamp of a user's sends inside the window
    /// ending at `now`, in one query so both describe the same rows.
    async fn window_usage(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(u32, Option<DateTime<Utc>>)> {
        use sqlx::Row;

        let start = self.window.start(now);

        let row = sqlx::query(
            r#"
            SELECT COUNT(*), MIN(sent_at)
            FROM send_records
            WHERE user_id = ? AND sent_at >= ? AND sent_at < ?
            "#,
        )
        .bind(user_id)
        .bind(start.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.db)
        .await?;

        let count: i64 = row.try_get(0)?;
        let oldest: Option<String> = row.try_get(1)?;

        let oldest = match oldest {
            Some(s) => Some(
                DateTime::parse_from_rfc3339(&s)
                    .map(|d| d.with_timezone(&Utc))
                    .map_err(|e| GateError::Parse(e.to_string()))?,
            ),
            None => None,
        };

        Ok((count as u32, oldest))
    }

    /// Delete send records older than the retention horizon.
    ///
    /// Returns the number of rows removed. The horizon is clamped to the
    /// window length, so counted rows are never pruned.
    pub async fn prune_expired(&self) -> Result<u64> {
        let cutoff = Utc::now() - self.retention;

        let result = sqlx::query("DELETE FROM send_records WHERE sent_at < ?")
            .bind(cutoff.to_rfc3339())
            .execute(&self.db)
            .await?;

        let pruned = result.rows_affected();
        if pruned > 0 {
            info!("Pruned {} expired send records", pruned);
        }

        Ok(pruned)
    }

    /// Total sends across all users inside the current window (for the
    /// admin overview)
    pub async fn total_sends_in_window(&self) -> Result<i64> {
        let now = Utc::now();
        let start = self.window.start(now);

        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM send_records WHERE sent_at >= ? AND sent_at < ?",
        )
        .bind(start.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.db)
        .await?;

        Ok(count.0)
    }

    pub fn send_limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> SendWindow {
        self.window
    }

    /// Verify the database answers queries
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}
