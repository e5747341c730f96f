//! Session lease allocation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use runnerhub_core::clock::Clock;
use runnerhub_core::error::{AppError, ErrorKind};
use runnerhub_core::result::AppResult;
use runnerhub_core::traits::CycleMeter;
use runnerhub_core::types::{ProjectId, RunnerId, SlotId, UserId};
use runnerhub_entity::slot::Lease;
use runnerhub_store::SlotStore;

use crate::quota::QuotaTracker;
use crate::term::LeaseTerm;

/// The outcome of a granted session request, returned to the caller so it
/// can render the countdown and connect to the runner once attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseGrant {
    /// The slot that was bound.
    pub slot_id: SlotId,
    /// The underlying runner; `None` until the provisioning collaborator
    /// attaches one.
    pub runner_id: Option<RunnerId>,
    /// When the lease began.
    pub started_at: DateTime<Utc>,
    /// Lease length in seconds.
    pub duration_secs: u64,
}

/// Assigns available slots to requesting users.
///
/// Per request: quota check first (a denial touches no slot), then an
/// id-ascending scan for a free slot, an atomic bind, and finally quota
/// recording. Bind and recording form one transaction: if recording
/// fails the slot is rolled back to available.
#[derive(Debug, Clone)]
pub struct LeaseAllocator {
    slots: Arc<dyn SlotStore>,
    quota: QuotaTracker,
    term: Arc<LeaseTerm>,
    meter: Arc<dyn CycleMeter>,
    clock: Arc<dyn Clock>,
}

impl LeaseAllocator {
    /// Creates an allocator over the given stores and collaborator seams.
    pub fn new(
        slots: Arc<dyn SlotStore>,
        quota: QuotaTracker,
        term: Arc<LeaseTerm>,
        meter: Arc<dyn CycleMeter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            slots,
            quota,
            term,
            meter,
            clock,
        }
    }

    /// Handles a session request for `(user, project)`.
    ///
    /// A user who already holds an occupied slot is rejected with
    /// `AlreadyLeased`; callers should redirect to the existing session.
    pub async fn allocate(&self, user: UserId, project: ProjectId) -> AppResult<LeaseGrant> {
        let now = self.clock.now();

        // Re-entrancy: surface the held slot before quota accounting so the
        // caller is told to redirect rather than retry later.
        if let Some(held) = self.slots.find_by_user(user).await? {
            return Err(AppError::already_leased(format!(
                "User {user} already holds slot {}",
                held.id
            )));
        }

        self.quota.check(user, now).await?;

        let duration_secs = self.term.get();
        let lease = Lease {
            user,
            project,
            started_at: now,
            duration_secs,
            start_cycles: self.meter.current_cycles(),
        };

        let candidates = self.slots.list_available().await?;
        let mut bound = None;
        for candidate in candidates {
            match self.slots.bind(candidate.id, lease.clone()).await {
                Ok(slot) => {
                    bound = Some(slot);
                    break;
                }
                // Lost a race for this slot; the next candidate may still be free
                Err(e) if e.kind == ErrorKind::SlotNotAvailable => continue,
                Err(e) => return Err(e),
            }
        }

        let Some(slot) = bound else {
            return Err(AppError::no_slots_available(
                "All shared runner slots are occupied",
            ));
        };

        if let Err(record_err) = self.quota.record(user, now).await {
            error!(
                user = %user,
                slot_id = %slot.id,
                error = %record_err,
                "Quota recording failed after bind, rolling slot back"
            );
            if let Err(rollback_err) = self.slots.release(slot.id).await {
                error!(
                    slot_id = %slot.id,
                    error = %rollback_err,
                    "Rollback release failed, slot may be stuck occupied"
                );
            }
            return Err(AppError::internal(format!(
                "Failed to record usage for granted lease: {record_err}"
            )));
        }

        info!(
            user = %user,
            project = %project,
            slot_id = %slot.id,
            duration_secs = duration_secs,
            "Session lease granted"
        );

        Ok(LeaseGrant {
            slot_id: slot.id,
            runner_id: slot.runner_id,
            started_at: now,
            duration_secs,
        })
    }
}
