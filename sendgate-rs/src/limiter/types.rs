//! Send limiter types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One recorded send event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRecord {
    pub id: String,
    pub user_id: String,
    pub sent_at: DateTime<Utc>,
}

/// Snapshot of a user's quota standing, as served to clients.
///
/// `remaining` never goes negative even when stored usage exceeds the
/// limit (the limit may have been lowered after the sends happened).
/// `allowed` folds the account status in: a paused account is denied no
/// matter how much quota is left.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendStats {
    pub used: u32,
    pub limit: u32,
    pub remaining: u32,
    pub allowed: bool,
    pub window_reset_at: DateTime<Utc>,
}

impl SendStats {
    pub fn compute(
        used: u32,
        limit: u32,
        account_active: bool,
        window_reset_at: DateTime<Utc>,
    ) -> Self {
        let remaining = limit.saturating_sub(used);
        Self {
            used,
            limit,
            remaining,
            allowed: account_active && remaining > 0,
            window_reset_at,
        }
    }
}

/// The rolling window `[now - duration, now)`.
///
/// Closed at the lower bound: a send stamped exactly `duration` ago still
/// counts. Open at the upper: a send stamped `now` belongs to the next
/// query's window.
#[derive(Debug, Clone, Copy)]
pub struct SendWindow {
    duration: Duration,
}

impl SendWindow {
    pub fn from_hours(hours: i64) -> Self {
        Self {
            duration: Duration::hours(hours),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Inclusive lower bound of the window ending at `now`
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration
    }

    /// When the window next frees a slot: the moment the oldest counted
    /// send ages out. With nothing counted the quota is already fresh,
    /// so the reset time is `now`.
    pub fn reset_at(&self, oldest_in_window: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
        match oldest_in_window {
            Some(oldest) => oldest + self.duration,
            None => now,
        }
    }
}
