//! Expiry reclamation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use runnerhub_core::clock::Clock;
use runnerhub_core::result::AppResult;
use runnerhub_core::types::SlotId;
use runnerhub_store::SlotStore;

/// A single slot that could not be released during a purge pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurgeFailure {
    /// The slot that failed to release.
    pub slot_id: SlotId,
    /// The release error, stringified.
    pub error: String,
}

/// Outcome of one `purge_expired` pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurgeReport {
    /// Slots returned to the available pool.
    pub reclaimed: Vec<SlotId>,
    /// Slots whose release failed. Failures never abort the pass.
    pub failed: Vec<PurgeFailure>,
}

impl PurgeReport {
    /// Number of slots reclaimed.
    pub fn reclaimed_count(&self) -> u64 {
        self.reclaimed.len() as u64
    }
}

/// Returns expired leases to the available pool.
///
/// This is the only way leases end other than an explicit admin reset;
/// there is no per-lease cancellation exposed to the leasing user.
#[derive(Debug, Clone)]
pub struct Reclaimer {
    slots: Arc<dyn SlotStore>,
    clock: Arc<dyn Clock>,
}

impl Reclaimer {
    /// Creates a reclaimer over the given slot store.
    pub fn new(slots: Arc<dyn SlotStore>, clock: Arc<dyn Clock>) -> Self {
        Self { slots, clock }
    }

    /// Scans for expired leases and releases their slots.
    ///
    /// `now` is snapshotted once for the whole scan, so every slot that
    /// satisfied the expiry predicate at scan start is examined. Releases
    /// are conditional on the lease still being expired, so a slot that was
    /// re-bound mid-pass keeps its fresh lease. Per-slot failures are
    /// accumulated; successes still commit.
    pub async fn purge_expired(&self) -> AppResult<PurgeReport> {
        let now = self.clock.now();
        let expired = self.slots.list_expired(now).await?;

        let mut report = PurgeReport::default();
        for slot_id in expired {
            match self.slots.release_if_expired(slot_id, now).await {
                Ok(true) => report.reclaimed.push(slot_id),
                // Re-bound since the scan; the fresh lease wins
                Ok(false) => {}
                Err(e) => {
                    warn!(slot_id = %slot_id, error = %e, "Failed to reclaim expired slot");
                    report.failed.push(PurgeFailure {
                        slot_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            reclaimed = report.reclaimed.len(),
            failed = report.failed.len(),
            "Expired session purge complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use runnerhub_core::clock::ManualClock;
    use runnerhub_core::error::AppError;
    use runnerhub_core::types::{ProjectId, UserId};
    use runnerhub_entity::slot::{Lease, Slot, SlotOccupancy, SlotPatch};
    use runnerhub_store::MemorySlotStore;

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

    #[tokio::test]
    async fn purge_reclaims_expired_slot_and_leaves_it_leasable() {
        let clock = Arc::new(ManualClock::at_epoch());
        let slots = Arc::new(MemorySlotStore::provision(2, "platform", clock.now()));
        let user = UserId::new();

        slots.bind(SlotId(1), lease_at(user, 0, 3600)).await.unwrap();

        clock.advance_secs(3700);
        let reclaimer = Reclaimer::new(slots.clone(), clock.clone());
        let report = reclaimer.purge_expired().await.unwrap();

        assert_eq!(report.reclaimed, vec![SlotId(1)]);
        assert!(report.failed.is_empty());

        // The slot is immediately leasable again, by the same user
        slots
            .bind(SlotId(1), lease_at(user, 3700, 3600))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn purge_leaves_no_expired_occupied_slots() {
        let clock = Arc::new(ManualClock::at_epoch());
        let slots = Arc::new(MemorySlotStore::provision(4, "platform", clock.now()));

        slots
            .bind(SlotId(1), lease_at(UserId::new(), 0, 100))
            .await
            .unwrap();
        slots
            .bind(SlotId(2), lease_at(UserId::new(), 0, 200))
            .await
            .unwrap();
        slots
            .bind(SlotId(3), lease_at(UserId::new(), 0, 10_000))
            .await
            .unwrap();

        clock.advance_secs(300);
        let reclaimer = Reclaimer::new(slots.clone(), clock.clone());
        let report = reclaimer.purge_expired().await.unwrap();

        assert_eq!(report.reclaimed.len(), 2);
        let now = clock.now();
        assert!(slots
            .list_all()
            .await
            .unwrap()
            .iter()
            .all(|s| !s.is_expired(now)));

        // The live lease survives
        let live = slots.get(SlotId(3)).await.unwrap().unwrap();
        assert!(live.is_occupied());
    }

    #[tokio::test]
    async fn purge_with_nothing_expired_is_a_noop() {
        let clock = Arc::new(ManualClock::at_epoch());
        let slots = Arc::new(MemorySlotStore::provision(2, "platform", clock.now()));
        slots
            .bind(SlotId(1), lease_at(UserId::new(), 0, 3600))
            .await
            .unwrap();

        let reclaimer = Reclaimer::new(slots.clone(), clock);
        let report = reclaimer.purge_expired().await.unwrap();
        assert!(report.reclaimed.is_empty());
        assert!(report.failed.is_empty());
    }

    /// Slot store that fails to release one chosen slot, for partial-failure
    /// testing.
    #[derive(Debug)]
    struct FlakyReleaseStore {
        inner: MemorySlotStore,
        fail_id: SlotId,
    }

    #[async_trait]
    impl runnerhub_store::SlotStore for FlakyReleaseStore {
        async fn list_all(&self) -> runnerhub_core::AppResult<Vec<Slot>> {
            self.inner.list_all().await
        }

        async fn list_available(&self) -> runnerhub_core::AppResult<Vec<Slot>> {
            self.inner.list_available().await
        }

        async fn list_used(&self) -> runnerhub_core::AppResult<Vec<SlotOccupancy>> {
            self.inner.list_used().await
        }

        async fn get(&self, id: SlotId) -> runnerhub_core::AppResult<Option<Slot>> {
            self.inner.get(id).await
        }

        async fn find_by_user(&self, user: UserId) -> runnerhub_core::AppResult<Option<Slot>> {
            self.inner.find_by_user(user).await
        }

        async fn bind(&self, id: SlotId, lease: Lease) -> runnerhub_core::AppResult<Slot> {
            self.inner.bind(id, lease).await
        }

        async fn release(&self, id: SlotId) -> runnerhub_core::AppResult<bool> {
            self.inner.release(id).await
        }

        async fn release_if_expired(
            &self,
            id: SlotId,
            now: DateTime<Utc>,
        ) -> runnerhub_core::AppResult<bool> {
            if id == self.fail_id {
                return Err(AppError::internal("simulated release failure"));
            }
            self.inner.release_if_expired(id, now).await
        }

        async fn list_expired(&self, now: DateTime<Utc>) -> runnerhub_core::AppResult<Vec<SlotId>> {
            self.inner.list_expired(now).await
        }

        async fn release_all(&self) -> runnerhub_core::AppResult<u64> {
            self.inner.release_all().await
        }

        async fn update(&self, id: SlotId, patch: SlotPatch) -> runnerhub_core::AppResult<Slot> {
            self.inner.update(id, patch).await
        }
    }

    #[tokio::test]
    async fn single_release_failure_does_not_abort_the_pass() {
        let clock = Arc::new(ManualClock::at_epoch());
        let inner = MemorySlotStore::provision(3, "platform", clock.now());
        inner
            .bind(SlotId(1), lease_at(UserId::new(), 0, 100))
            .await
            .unwrap();
        inner
            .bind(SlotId(2), lease_at(UserId::new(), 0, 100))
            .await
            .unwrap();
        inner
            .bind(SlotId(3), lease_at(UserId::new(), 0, 100))
            .await
            .unwrap();

        let store = Arc::new(FlakyReleaseStore {
            inner,
            fail_id: SlotId(2),
        });

        clock.advance_secs(200);
        let reclaimer = Reclaimer::new(store, clock);
        let report = reclaimer.purge_expired().await.unwrap();

        assert_eq!(report.reclaimed, vec![SlotId(1), SlotId(3)]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].slot_id, SlotId(2));
    }
}
