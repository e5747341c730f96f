//! Administrative control surface.
//!
//! Bulk operations layered on the stores. All of them are global and
//! irreversible, so each is a separately named method, never folded into
//! a generic update, and the boundary is expected to confirm before
//! calling.

use std::sync::Arc;

use tracing::{info, warn};

use runnerhub_core::result::AppResult;
use runnerhub_core::types::{SlotId, UserId};
use runnerhub_entity::pool::PoolStats;
use runnerhub_entity::slot::{Slot, SlotPatch};
use runnerhub_entity::usage::UsageLog;
use runnerhub_store::{SlotStore, UsageStore};

use crate::reclaim::{PurgeReport, Reclaimer};
use crate::term::{DurationChange, LeaseTerm};

/// Admin operations over the slot pool and usage logs.
#[derive(Debug, Clone)]
pub struct AdminControl {
    slots: Arc<dyn SlotStore>,
    usage: Arc<dyn UsageStore>,
    term: Arc<LeaseTerm>,
    reclaimer: Reclaimer,
}

impl AdminControl {
    /// Creates the control surface.
    pub fn new(
        slots: Arc<dyn SlotStore>,
        usage: Arc<dyn UsageStore>,
        term: Arc<LeaseTerm>,
        reclaimer: Reclaimer,
    ) -> Self {
        Self {
            slots,
            usage,
            term,
            reclaimer,
        }
    }

    /// Unconditionally releases every slot, regardless of remaining time.
    /// Emergency pool recovery; irreversible.
    pub async fn reset_all_slots(&self) -> AppResult<u64> {
        warn!("Admin reset of all slots requested");
        self.slots.release_all().await
    }

    /// Overrides the platform-wide lease duration for future allocations.
    /// Already-occupied leases keep their stamped duration.
    pub async fn set_duration(&self, new_secs: u64) -> AppResult<DurationChange> {
        let change = self.term.set(new_secs)?;
        info!(
            previous_secs = change.previous_secs,
            new_secs = change.new_secs,
            "Platform lease duration changed"
        );
        Ok(change)
    }

    /// Wipes all usage logs. Full-system quota amnesty; irreversible.
    pub async fn delete_usage_logs(&self) -> AppResult<u64> {
        warn!("Admin deletion of all usage logs requested");
        self.usage.delete_all().await
    }

    /// Force-resets one user's window counter without touching their
    /// lifetime quota.
    pub async fn reset_window(&self, user: UserId) -> AppResult<bool> {
        self.usage.reset_window(user).await
    }

    /// All usage logs, for admin dashboards.
    pub async fn list_usage_logs(&self) -> AppResult<Vec<UsageLog>> {
        self.usage.list_all().await
    }

    /// Arbitrary field overwrite on a single slot. Manual correction only.
    pub async fn update_slot(&self, id: SlotId, patch: SlotPatch) -> AppResult<Slot> {
        self.slots.update(id, patch).await
    }

    /// Runs an expiry purge pass.
    pub async fn purge_expired(&self) -> AppResult<PurgeReport> {
        self.reclaimer.purge_expired().await
    }

    /// Current pool occupancy statistics.
    pub async fn pool_stats(&self) -> AppResult<PoolStats> {
        let slots = self.slots.list_all().await?;
        let occupied = slots.iter().filter(|s| s.is_occupied()).count() as u32;
        Ok(PoolStats::from_counts(slots.len() as u32, occupied))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{DateTime, Utc};

    use runnerhub_core::clock::{Clock, ManualClock};
    use runnerhub_core::config::quota::QuotaConfig;
    use runnerhub_core::types::ProjectId;
    use runnerhub_entity::slot::Lease;
    use runnerhub_store::{MemorySlotStore, MemoryUsageStore};

    fn epoch(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(secs, 0).unwrap()
    }

    fn lease_at(user: UserId, started_secs: i64, duration_secs: u64) -> Lease {
        Lease {
            user,
            project: ProjectId::new(),
            started_at: epoch(started_secs),
            duration_secs,
            start_cycles: 0,
        }
    }

    struct Harness {
        slots: Arc<MemorySlotStore>,
        usage: Arc<MemoryUsageStore>,
        admin: AdminControl,
    }

    fn harness(pool_size: u32) -> Harness {
        let clock = Arc::new(ManualClock::at_epoch());
        let slots = Arc::new(MemorySlotStore::provision(
            pool_size,
            "platform",
            clock.now(),
        ));
        let usage = Arc::new(MemoryUsageStore::new(QuotaConfig::default()));
        let term = Arc::new(LeaseTerm::new(3600));
        let reclaimer = Reclaimer::new(slots.clone(), clock);
        let admin = AdminControl::new(slots.clone(), usage.clone(), term, reclaimer);
        Harness {
            slots,
            usage,
            admin,
        }
    }

    #[tokio::test]
    async fn reset_all_releases_live_leases() {
        let h = harness(3);
        h.slots
            .bind(SlotId(1), lease_at(UserId::new(), 0, 10_000))
            .await
            .unwrap();
        h.slots
            .bind(SlotId(2), lease_at(UserId::new(), 0, 10_000))
            .await
            .unwrap();

        assert_eq!(h.admin.reset_all_slots().await.unwrap(), 2);
        assert!(h
            .slots
            .list_all()
            .await
            .unwrap()
            .iter()
            .all(|s| s.status.is_available()));
    }

    #[tokio::test]
    async fn set_duration_does_not_rewrite_occupied_leases() {
        let h = harness(1);
        h.slots
            .bind(SlotId(1), lease_at(UserId::new(), 0, 3600))
            .await
            .unwrap();

        let change = h.admin.set_duration(60).await.unwrap();
        assert_eq!(change.previous_secs, 3600);
        assert_eq!(change.new_secs, 60);

        let slot = h.slots.get(SlotId(1)).await.unwrap().unwrap();
        assert_eq!(slot.lease().unwrap().duration_secs, 3600);
    }

    #[tokio::test]
    async fn delete_usage_logs_reports_count() {
        let h = harness(1);
        h.usage.record(UserId::new(), epoch(0)).await.unwrap();
        h.usage.record(UserId::new(), epoch(0)).await.unwrap();

        assert_eq!(h.admin.delete_usage_logs().await.unwrap(), 2);
        assert!(h.admin.list_usage_logs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn pool_stats_reflect_occupancy() {
        let h = harness(4);
        h.slots
            .bind(SlotId(1), lease_at(UserId::new(), 0, 60))
            .await
            .unwrap();

        let stats = h.admin.pool_stats().await.unwrap();
        assert_eq!(stats.total_slots, 4);
        assert_eq!(stats.occupied, 1);
        assert_eq!(stats.available, 3);
    }
}
