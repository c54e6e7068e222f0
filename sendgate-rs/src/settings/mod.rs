//! Per-user settings: application mode and account status
//!
//! The account status is the gate that overrides quota: a paused user is
//! never allowed to send, however much quota remains.

pub mod manager;
pub mod types;

pub use manager::SettingsManager;
pub use types::{AccountStatus, ApplicationMode, UserSettings};
