//! In-memory slot pool using a Tokio mutex for single-node deployments.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};

use runnerhub_core::error::AppError;
use runnerhub_core::result::AppResult;
use runnerhub_core::types::{SlotId, UserId};
use runnerhub_entity::slot::{Lease, Slot, SlotOccupancy, SlotPatch, SlotStatus};

use crate::slot_store::SlotStore;

/// In-memory slot pool serialized by a single Tokio mutex.
///
/// The single-writer lock makes bind-vs-purge races and the
/// one-lease-per-user check atomic. Suitable for single-node deployments
/// only. The `BTreeMap` keeps iteration in id-ascending order, which is
/// the allocator's selection order.
#[derive(Debug, Clone)]
pub struct MemorySlotStore {
    slots: Arc<Mutex<BTreeMap<SlotId, Slot>>>,
}

impl MemorySlotStore {
    /// Provisions a pool of `count` slots numbered `1..=count`.
    ///
    /// Called once at startup; slot records are never destroyed afterwards.
    pub fn provision(count: u32, owner: &str, created_at: DateTime<Utc>) -> Self {
        let slots = (1..=count as i64)
            .map(|id| {
                let slot = Slot {
                    id: SlotId(id),
                    runner_id: None,
                    owner: owner.to_string(),
                    created_at,
                    status: SlotStatus::Available,
                };
                (slot.id, slot)
            })
            .collect();

        Self {
            slots: Arc::new(Mutex::new(slots)),
        }
    }
}

#[async_trait]
impl SlotStore for MemorySlotStore {
    async fn list_all(&self) -> AppResult<Vec<Slot>> {
        let slots = self.slots.lock().await;
        Ok(slots.values().cloned().collect())
    }

    async fn list_available(&self) -> AppResult<Vec<Slot>> {
        let slots = self.slots.lock().await;
        Ok(slots
            .values()
            .filter(|s| s.status.is_available())
            .cloned()
            .collect())
    }

    async fn list_used(&self) -> AppResult<Vec<SlotOccupancy>> {
        let slots = self.slots.lock().await;
        Ok(slots
            .values()
            .map(|s| SlotOccupancy {
                slot_id: s.id,
                in_use: s.is_occupied(),
            })
            .collect())
    }

    async fn get(&self, id: SlotId) -> AppResult<Option<Slot>> {
        let slots = self.slots.lock().await;
        Ok(slots.get(&id).cloned())
    }

    async fn find_by_user(&self, user: UserId) -> AppResult<Option<Slot>> {
        let slots = self.slots.lock().await;
        Ok(slots.values().find(|s| s.leased_by(user)).cloned())
    }

    async fn bind(&self, id: SlotId, lease: Lease) -> AppResult<Slot> {
        let mut slots = self.slots.lock().await;

        if let Some(held) = slots.values().find(|s| s.leased_by(lease.user)) {
            return Err(AppError::already_leased(format!(
                "User {} already holds slot {}",
                lease.user, held.id
            )));
        }

        let slot = slots
            .get_mut(&id)
            .ok_or_else(|| AppError::slot_not_found(format!("Slot {id} does not exist")))?;

        if slot.is_occupied() {
            return Err(AppError::slot_not_available(format!(
                "Slot {id} is already occupied"
            )));
        }

        slot.status = SlotStatus::Occupied {
            lease: lease.clone(),
        };
        info!(
            slot_id = %id,
            user = %lease.user,
            project = %lease.project,
            duration_secs = lease.duration_secs,
            "Slot bound"
        );

        Ok(slot.clone())
    }

    async fn release(&self, id: SlotId) -> AppResult<bool> {
        let mut slots = self.slots.lock().await;

        let slot = slots
            .get_mut(&id)
            .ok_or_else(|| AppError::slot_not_found(format!("Slot {id} does not exist")))?;

        if slot.status.is_available() {
            warn!(slot_id = %id, "Attempted to release slot that was not occupied");
            return Ok(false);
        }

        slot.status = SlotStatus::Available;
        info!(slot_id = %id, "Slot released");
        Ok(true)
    }

    async fn release_if_expired(&self, id: SlotId, now: DateTime<Utc>) -> AppResult<bool> {
        let mut slots = self.slots.lock().await;

        let slot = slots
            .get_mut(&id)
            .ok_or_else(|| AppError::slot_not_found(format!("Slot {id} does not exist")))?;

        if !slot.is_expired(now) {
            return Ok(false);
        }

        slot.status = SlotStatus::Available;
        info!(slot_id = %id, "Expired slot reclaimed");
        Ok(true)
    }

    async fn list_expired(&self, now: DateTime<Utc>) -> AppResult<Vec<SlotId>> {
        let slots = self.slots.lock().await;
        Ok(slots
            .values()
            .filter(|s| s.is_expired(now))
            .map(|s| s.id)
            .collect())
    }

    async fn release_all(&self) -> AppResult<u64> {
        let mut slots = self.slots.lock().await;
        let mut released = 0u64;

        for slot in slots.values_mut() {
            if slot.is_occupied() {
                slot.status = SlotStatus::Available;
                released += 1;
            }
        }

        info!(released = released, "All slots reset");
        Ok(released)
    }

    async fn update(&self, id: SlotId, patch: SlotPatch) -> AppResult<Slot> {
        let mut slots = self.slots.lock().await;

        let slot = slots
            .get_mut(&id)
            .ok_or_else(|| AppError::slot_not_found(format!("Slot {id} does not exist")))?;

        if let Some(runner_id) = patch.runner_id {
            slot.runner_id = Some(runner_id);
        }
        if let Some(owner) = patch.owner {
            slot.owner = owner;
        }
        if let Some(status) = patch.status {
            slot.status = status;
        }

        info!(slot_id = %id, "Slot updated by admin");
        Ok(slot.clone())
    }
}
