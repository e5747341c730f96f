//! Usage quota configuration.

use serde::{Deserialize, Serialize};

/// Per-user usage quota configuration.
///
/// These values seed the usage log created on a user's first request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Maximum lease requests inside one rolling window.
    #[serde(default = "default_max_uses")]
    pub max_uses_threshold: u32,
    /// Rolling window length in seconds. The usage counter resets on the
    /// first request after the window has elapsed.
    #[serde(default = "default_window")]
    pub rate_limit_window_secs: u64,
    /// Lifetime allowance, independent of the rolling window.
    #[serde(default = "default_quota_total")]
    pub quota_total: u64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            max_uses_threshold: default_max_uses(),
            rate_limit_window_secs: default_window(),
            quota_total: default_quota_total(),
        }
    }
}

fn default_max_uses() -> u32 {
    5
}

fn default_window() -> u64 {
    86_400
}

fn default_quota_total() -> u64 {
    100
}
