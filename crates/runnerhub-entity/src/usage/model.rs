//! Per-user usage log entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use runnerhub_core::config::quota::QuotaConfig;
use runnerhub_core::types::UserId;

/// A longer-lived allowance independent of the rolling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaAllowance {
    /// Lease requests consumed over the lifetime of the log.
    pub consumed: u64,
    /// Total lifetime allowance.
    pub total: u64,
}

impl QuotaAllowance {
    /// Whether the lifetime allowance is used up.
    pub fn is_exhausted(&self) -> bool {
        self.consumed >= self.total
    }

    /// Remaining lifetime allowance, saturating at zero.
    pub fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.consumed)
    }
}

/// Per-user rolling usage counter plus lifetime quota.
///
/// Created on a user's first lease request and kept indefinitely unless an
/// admin issues a bulk delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLog {
    /// The user this log belongs to.
    pub user: UserId,
    /// Whether the rolling window is currently counting.
    pub is_active: bool,
    /// Lease requests consumed in the current window.
    pub usage_count: u32,
    /// Timestamp of the most recent lease request.
    pub last_used: Option<DateTime<Utc>>,
    /// Window length in seconds after which `usage_count` resets,
    /// relative to `last_used`.
    pub rate_limit_window_secs: u64,
    /// Cap compared against `usage_count` to approve or deny a request.
    pub max_uses_threshold: u32,
    /// Lifetime allowance.
    pub quota: QuotaAllowance,
}

impl UsageLog {
    /// Creates a fresh log for a user from the configured quota defaults.
    pub fn new(user: UserId, defaults: &QuotaConfig) -> Self {
        Self {
            user,
            is_active: false,
            usage_count: 0,
            last_used: None,
            rate_limit_window_secs: defaults.rate_limit_window_secs,
            max_uses_threshold: defaults.max_uses_threshold,
            quota: QuotaAllowance {
                consumed: 0,
                total: defaults.quota_total,
            },
        }
    }

    /// Whether the rolling window has elapsed since the last request.
    ///
    /// A log with no recorded request yet counts as elapsed.
    pub fn window_elapsed(&self, now: DateTime<Utc>) -> bool {
        match self.last_used {
            None => true,
            Some(last) => (now - last).num_seconds() > self.rate_limit_window_secs as i64,
        }
    }

    /// The usage count that applies to a request arriving at `now`: zero if
    /// the window has elapsed, the stored count otherwise.
    pub fn effective_count(&self, now: DateTime<Utc>) -> u32 {
        if self.window_elapsed(now) {
            0
        } else {
            self.usage_count
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_with(count: u32, last_used_epoch: i64, window_secs: u64) -> UsageLog {
        let mut log = UsageLog::new(UserId::new(), &QuotaConfig::default());
        log.usage_count = count;
        log.last_used = Some(DateTime::<Utc>::from_timestamp(last_used_epoch, 0).unwrap());
        log.rate_limit_window_secs = window_secs;
        log
    }

    #[test]
    fn fresh_log_counts_as_elapsed() {
        let log = UsageLog::new(UserId::new(), &QuotaConfig::default());
        assert!(log.window_elapsed(Utc::now()));
        assert_eq!(log.effective_count(Utc::now()), 0);
    }

    #[test]
    fn window_elapses_strictly_after_boundary() {
        let log = log_with(3, 0, 100);
        let at_boundary = DateTime::<Utc>::from_timestamp(100, 0).unwrap();
        let past_boundary = DateTime::<Utc>::from_timestamp(101, 0).unwrap();

        assert!(!log.window_elapsed(at_boundary));
        assert_eq!(log.effective_count(at_boundary), 3);
        assert!(log.window_elapsed(past_boundary));
        assert_eq!(log.effective_count(past_boundary), 0);
    }

    #[test]
    fn quota_exhaustion() {
        let quota = QuotaAllowance {
            consumed: 100,
            total: 100,
        };
        assert!(quota.is_exhausted());
        assert_eq!(quota.remaining(), 0);

        let quota = QuotaAllowance {
            consumed: 99,
            total: 100,
        };
        assert!(!quota.is_exhausted());
        assert_eq!(quota.remaining(), 1);
    }
}
