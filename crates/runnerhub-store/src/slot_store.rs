//! Slot pool store trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use runnerhub_core::result::AppResult;
use runnerhub_core::types::{SlotId, UserId};
use runnerhub_entity::slot::{Lease, Slot, SlotOccupancy, SlotPatch};

/// The authoritative set of leaseable runner slots.
///
/// Implementations must serialize slot mutations so that two concurrent
/// allocation requests can never bind the same slot, and a reclamation
/// pass can never race a fresh bind into a double-write. The
/// one-active-lease-per-user rule is enforced inside [`bind`] under the
/// same serialization.
///
/// [`bind`]: SlotStore::bind
#[async_trait]
pub trait SlotStore: Send + Sync + std::fmt::Debug {
    /// All slots with their current status. No side effects.
    async fn list_all(&self) -> AppResult<Vec<Slot>>;

    /// Slots currently available for lease, id ascending.
    async fn list_available(&self) -> AppResult<Vec<Slot>>;

    /// `(slot_id, in_use)` pairs for quick occupancy dashboards.
    async fn list_used(&self) -> AppResult<Vec<SlotOccupancy>>;

    /// Looks up a single slot.
    async fn get(&self, id: SlotId) -> AppResult<Option<Slot>>;

    /// The slot currently leased by the given user, if any.
    async fn find_by_user(&self, user: UserId) -> AppResult<Option<Slot>>;

    /// Transitions a slot from available to occupied with the given lease.
    ///
    /// Fails with `SlotNotFound` for an unknown id, `SlotNotAvailable` if
    /// the slot is already occupied, and `AlreadyLeased` if the lease's
    /// user already occupies any slot in the pool.
    async fn bind(&self, id: SlotId, lease: Lease) -> AppResult<Slot>;

    /// Transitions a slot back to available, clearing all lease data.
    ///
    /// Idempotent: releasing an already-available slot is not an error.
    /// Returns whether a lease was actually cleared.
    async fn release(&self, id: SlotId) -> AppResult<bool>;

    /// Releases the slot only if its lease is expired as of `now`.
    ///
    /// Used by reclamation so that a slot re-bound after the expiry scan
    /// is never clobbered. Returns whether the slot was released.
    async fn release_if_expired(&self, id: SlotId, now: DateTime<Utc>) -> AppResult<bool>;

    /// Ids of occupied slots whose lease is expired as of `now`.
    async fn list_expired(&self, now: DateTime<Utc>) -> AppResult<Vec<SlotId>>;

    /// Unconditionally releases every slot. Admin-only emergency recovery;
    /// holds the pool lock for the whole pass. Returns the count released.
    async fn release_all(&self) -> AppResult<u64>;

    /// Arbitrary field overwrite for manual correction. Bypasses the
    /// allocator invariants; not part of the normal lease flow.
    async fn update(&self, id: SlotId, patch: SlotPatch) -> AppResult<Slot>;
}
