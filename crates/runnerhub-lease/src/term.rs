//! Platform-wide lease duration.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use runnerhub_core::error::AppError;
use runnerhub_core::result::AppResult;

/// Result of an admin duration override.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DurationChange {
    /// The duration that was in effect before the change, in seconds.
    pub previous_secs: u64,
    /// The duration now applied to future allocations, in seconds.
    pub new_secs: u64,
}

/// The lease duration applied platform-wide to new allocations.
///
/// Admin overrides affect future leases only; already-occupied slots keep
/// the duration stamped at bind time.
#[derive(Debug)]
pub struct LeaseTerm {
    secs: AtomicU64,
}

impl LeaseTerm {
    /// Creates the term with the configured default duration.
    pub fn new(default_secs: u64) -> Self {
        Self {
            secs: AtomicU64::new(default_secs),
        }
    }

    /// The duration currently applied to new leases, in seconds.
    pub fn get(&self) -> u64 {
        self.secs.load(Ordering::SeqCst)
    }

    /// Overrides the duration for future allocations.
    pub fn set(&self, new_secs: u64) -> AppResult<DurationChange> {
        if new_secs == 0 {
            return Err(AppError::validation("Lease duration must be positive"));
        }

        let previous_secs = self.secs.swap(new_secs, Ordering::SeqCst);
        Ok(DurationChange {
            previous_secs,
            new_secs,
        })
    }
}
