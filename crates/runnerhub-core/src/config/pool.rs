//! Slot pool provisioning configuration.

use serde::{Deserialize, Serialize};

/// Slot pool provisioning configuration.
///
/// Slot records are created once at startup and only transition between
/// available and occupied afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of shared runner slots to provision.
    #[serde(default = "default_size")]
    pub size: u32,
    /// Platform identity that owns the underlying runners.
    #[serde(default = "default_owner")]
    pub owner: String,
    /// Pool usage percentage at which a warning is logged.
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold_percent: u8,
    /// Pool usage percentage considered critical.
    #[serde(default = "default_critical_threshold")]
    pub critical_threshold_percent: u8,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            owner: default_owner(),
            warning_threshold_percent: default_warning_threshold(),
            critical_threshold_percent: default_critical_threshold(),
        }
    }
}

fn default_size() -> u32 {
    10
}

fn default_owner() -> String {
    "platform".to_string()
}

fn default_warning_threshold() -> u8 {
    80
}

fn default_critical_threshold() -> u8 {
    95
}
