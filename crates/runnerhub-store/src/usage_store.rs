//! Usage log store trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use runnerhub_core::result::AppResult;
use runnerhub_core::types::UserId;
use runnerhub_entity::usage::UsageLog;

/// Per-user usage logs backing the quota tracker.
///
/// The window-reset read-modify-write in [`record`] must be atomic per
/// user so two concurrent requests cannot both observe a stale count.
///
/// [`record`]: UsageStore::record
#[async_trait]
pub trait UsageStore: Send + Sync + std::fmt::Debug {
    /// The user's log, if one exists.
    async fn get(&self, user: UserId) -> AppResult<Option<UsageLog>>;

    /// All usage logs (admin dashboards).
    async fn list_all(&self) -> AppResult<Vec<UsageLog>>;

    /// Records a granted lease request: creates the log on first use,
    /// resets the counter when the window has elapsed, then increments
    /// both `usage_count` and `quota.consumed` and stamps `last_used`.
    /// Returns the updated log.
    async fn record(&self, user: UserId, now: DateTime<Utc>) -> AppResult<UsageLog>;

    /// Force-resets the user's window counter to zero without touching
    /// `quota.consumed`. Returns whether a log existed.
    async fn reset_window(&self, user: UserId) -> AppResult<bool>;

    /// Wipes all usage logs. Irreversible; returns the count deleted.
    async fn delete_all(&self) -> AppResult<u64>;
}
