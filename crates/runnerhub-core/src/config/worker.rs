//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the background worker runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron schedule for the expired-lease purge (6-field cron).
    #[serde(default = "default_purge_schedule")]
    pub purge_schedule: String,
    /// Cron schedule for pool stats observation logging.
    #[serde(default = "default_stats_schedule")]
    pub stats_schedule: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            purge_schedule: default_purge_schedule(),
            stats_schedule: default_stats_schedule(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_purge_schedule() -> String {
    // Every minute
    "0 * * * * *".to_string()
}

fn default_stats_schedule() -> String {
    // Every 5 minutes
    "0 */5 * * * *".to_string()
}
