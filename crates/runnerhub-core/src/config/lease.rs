//! Lease duration configuration.

use serde::{Deserialize, Serialize};

/// Session lease configuration.
///
/// The duration is applied platform-wide to new allocations. Admins can
/// override it at runtime; the override affects future leases only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseConfig {
    /// Default lease length in seconds.
    #[serde(default = "default_duration")]
    pub duration_secs: u64,
}

impl Default for LeaseConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration(),
        }
    }
}

fn default_duration() -> u64 {
    3600
}
