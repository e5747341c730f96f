//! Aggregate pool statistics.

use serde::{Deserialize, Serialize};

/// Live occupancy statistics for the slot pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolStats {
    /// Total slots provisioned.
    pub total_slots: u32,
    /// Slots currently occupied.
    pub occupied: u32,
    /// Slots available for lease.
    pub available: u32,
    /// Occupancy as a percentage of the pool.
    pub usage_percent: f64,
}

impl PoolStats {
    /// Builds stats from raw counts.
    pub fn from_counts(total_slots: u32, occupied: u32) -> Self {
        let usage_percent = if total_slots == 0 {
            0.0
        } else {
            occupied as f64 / total_slots as f64 * 100.0
        };
        Self {
            total_slots,
            occupied,
            available: total_slots.saturating_sub(occupied),
            usage_percent,
        }
    }

    /// Check if the pool is at warning threshold.
    pub fn is_warning(&self, threshold_percent: u8) -> bool {
        self.usage_percent >= threshold_percent as f64
    }

    /// Check if the pool is at critical threshold.
    pub fn is_critical(&self, threshold_percent: u8) -> bool {
        self.usage_percent >= threshold_percent as f64
    }
}
