//! Per-user send limiting over a rolling window
//!
//! Every application send is recorded as a row; a user's standing is
//! recomputed from the rows inside `[now - window, now)` on every read,
//! so nothing needs a scheduled counter reset.

pub mod manager;
pub mod types;

pub use manager::SendLimiter;
pub use types::{SendRecord, SendStats, SendWindow};
