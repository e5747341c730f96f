//! Usage quota tracking.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use runnerhub_core::error::AppError;
use runnerhub_core::result::AppResult;
use runnerhub_core::types::UserId;
use runnerhub_entity::usage::UsageLog;
use runnerhub_store::UsageStore;

/// Applies the rolling-window and lifetime quota rules per user.
///
/// `check` never mutates state; `record` is only called after a successful
/// allocation, never on denial.
#[derive(Debug, Clone)]
pub struct QuotaTracker {
    store: Arc<dyn UsageStore>,
}

impl QuotaTracker {
    /// Creates a tracker over the given usage store.
    pub fn new(store: Arc<dyn UsageStore>) -> Self {
        Self { store }
    }

    /// Checks whether a lease request from `user` may proceed at `now`.
    ///
    /// A request is denied when the lifetime quota is exhausted, or when the
    /// effective window count (zero if the window has elapsed) has reached
    /// `max_uses_threshold`. A user with no log yet is always allowed.
    pub async fn check(&self, user: UserId, now: DateTime<Utc>) -> AppResult<()> {
        let Some(log) = self.store.get(user).await? else {
            return Ok(());
        };

        // Lifetime cap applies regardless of window state
        if log.quota.is_exhausted() {
            return Err(AppError::quota_exceeded(format!(
                "Lifetime quota exhausted ({}/{})",
                log.quota.consumed, log.quota.total
            )));
        }

        let effective = log.effective_count(now);
        if effective >= log.max_uses_threshold {
            return Err(AppError::quota_exceeded(format!(
                "Rate limit reached ({effective}/{} in the current window)",
                log.max_uses_threshold
            )));
        }

        debug!(user = %user, effective_count = effective, "Quota check passed");
        Ok(())
    }

    /// Records a granted lease request against the user's log.
    pub async fn record(&self, user: UserId, now: DateTime<Utc>) -> AppResult<UsageLog> {
        self.store.record(user, now).await
    }

    /// The user's current log, if one exists. Read-only.
    pub async fn usage_for(&self, user: UserId) -> AppResult<Option<UsageLog>> {
        self.store.get(user).await
    }
}
