use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How applications are submitted for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationMode {
    #[serde(rename = "MANUAL")]
    Manual,
    #[serde(rename = "AUTO")]
    Auto,
}

impl ApplicationMode {
    /// Parse a mode from its wire value. Exact match only; anything else
    /// is rejected by the caller as an invalid argument.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MANUAL" => Some(Self::Manual),
            "AUTO" => Some(Self::Auto),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "MANUAL",
            Self::Auto => "AUTO",
        }
    }
}

impl Default for ApplicationMode {
    fn default() -> Self {
        Self::Manual
    }
}

/// Account-level gate on sending, independent of quota
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "paused")]
    Paused,
}

impl AccountStatus {
    /// Parse a status from its wire value. Exact match only.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
        }
    }
}

impl Default for AccountStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// Stored settings for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: String,
    pub application_mode: ApplicationMode,
    pub account_status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserSettings {
    /// Settings for a user with no stored row: `MANUAL` mode, `active`
    /// status. Read paths resolve to this without writing anything.
    pub fn defaults_for(user_id: &str) -> Self {
        let now = Utc::now();
        UserSettings {
            user_id: user_id.to_string(),
            application_mode: ApplicationMode::default(),
            account_status: AccountStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the account gate permits sending at all
    pub fn is_active(&self) -> bool {
        self.account_status == AccountStatus::Active
    }
}
