//! Prometheus metrics for API monitoring

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Simple metrics collector
pub struct Metrics {
    /// Total quota stat queries served
    pub stats_requests_total: AtomicU64,
    /// Total sends recorded
    pub sends_recorded_total: AtomicU64,
    /// Stat queries answered with allowed=false
    pub sends_denied_total: AtomicU64,
    /// Account status changes applied
    pub status_changes_total: AtomicU64,
    /// Rejected authentication attempts
    pub auth_failures_total: AtomicU64,
    /// Server start time
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            stats_requests_total: AtomicU64::new(0),
            sends_recorded_total: AtomicU64::new(0),
            sends_denied_total: AtomicU64::new(0),
            status_changes_total: AtomicU64::new(0),
            auth_failures_total: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Increment stat query counter
    pub fn inc_stats_requests(&self) {
        self.stats_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment recorded sends counter
    pub fn inc_sends_recorded(&self) {
        self.sends_recorded_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment denied-send counter
    pub fn inc_sends_denied(&self) {
        self.sends_denied_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment status change counter
    pub fn inc_status_changes(&self) {
        self.status_changes_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment auth failure counter
    pub fn inc_auth_failures(&self) {
        self.auth_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Format metrics in Prometheus format
    pub fn to_prometheus(&self) -> String {
        format!(
            r#"# HELP sendgate_stats_requests_total Total quota stat queries served
# TYPE sendgate_stats_requests_total counter
sendgate_stats_requests_total {}

# HELP sendgate_sends_recorded_total Total sends recorded
# TYPE sendgate_sends_recorded_total counter
sendgate_sends_recorded_total {}

# HELP sendgate_sends_denied_total Stat queries answered with allowed=false
# TYPE sendgate_sends_denied_total counter
sendgate_sends_denied_total {}

# HELP sendgate_status_changes_total Account status changes applied
# TYPE sendgate_status_changes_total counter
sendgate_status_changes_total {}

# HELP sendgate_auth_failures_total Rejected authentication attempts
# TYPE sendgate_auth_failures_total counter
sendgate_auth_failures_total {}

# HELP sendgate_uptime_seconds Server uptime in seconds
# TYPE sendgate_uptime_seconds gauge
sendgate_uptime_seconds {}
"#,
            self.stats_requests_total.load(Ordering::Relaxed),
            self.sends_recorded_total.load(Ordering::Relaxed),
            self.sends_denied_total.load(Ordering::Relaxed),
            self.status_changes_total.load(Ordering::Relaxed),
            self.auth_failures_total.load(Ordering::Relaxed),
            self.uptime_seconds(),
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
