//! Slot entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use runnerhub_core::types::{ProjectId, RunnerId, SlotId, UserId};

/// A time-boxed borrow of a slot by a freemium user.
///
/// A lease has no independent lifecycle: it exists only as the occupied
/// state of a [`Slot`] and is destroyed when the slot is released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lease {
    /// The user currently borrowing the slot.
    pub user: UserId,
    /// The project the session was requested for.
    pub project: ProjectId,
    /// When the lease began.
    pub started_at: DateTime<Utc>,
    /// Lease length in seconds, stamped from the platform-wide default at
    /// allocation time.
    pub duration_secs: u64,
    /// Resource-accounting baseline captured at lease start. Informational.
    pub start_cycles: u64,
}

impl Lease {
    /// The instant this lease expires.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.started_at + chrono::Duration::seconds(self.duration_secs as i64)
    }

    /// Whether the lease has expired as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }

    /// Seconds remaining until expiry, saturating at zero.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> u64 {
        (self.expires_at() - now).num_seconds().max(0) as u64
    }
}

/// Occupancy state of a slot.
///
/// A closed tagged variant: an occupied slot always carries its lease data,
/// and an available slot cannot carry any. This makes the "occupied iff
/// user and start timestamp are set" invariant hold by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotStatus {
    /// The slot is free to be leased.
    Available,
    /// The slot is leased out.
    Occupied {
        /// The active lease.
        lease: Lease,
    },
}

impl SlotStatus {
    /// Whether the slot is free.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// The active lease, if any.
    pub fn lease(&self) -> Option<&Lease> {
        match self {
            Self::Available => None,
            Self::Occupied { lease } => Some(lease),
        }
    }
}

/// A leaseable unit in the shared runner pool.
///
/// Slot records are created once at pool provisioning and never destroyed;
/// they only transition between available and occupied and are re-stamped
/// with new lease metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Unique slot identifier, assigned sequentially at provisioning.
    pub id: SlotId,
    /// The underlying compute instance bound to this slot. Absent until a
    /// runner is attached by the provisioning collaborator.
    pub runner_id: Option<RunnerId>,
    /// Platform identity that owns the underlying runner.
    pub owner: String,
    /// When the slot record was created.
    pub created_at: DateTime<Utc>,
    /// Current occupancy state.
    pub status: SlotStatus,
}

impl Slot {
    /// Whether the slot is currently leased out.
    pub fn is_occupied(&self) -> bool {
        !self.status.is_available()
    }

    /// The active lease, if any.
    pub fn lease(&self) -> Option<&Lease> {
        self.status.lease()
    }

    /// Whether this slot is leased by the given user.
    pub fn leased_by(&self, user: UserId) -> bool {
        self.lease().is_some_and(|l| l.user == user)
    }

    /// Whether the slot's lease has expired as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.lease().is_some_and(|l| l.is_expired(now))
    }
}

/// Quick occupancy view used for admin dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotOccupancy {
    /// Slot identifier.
    pub slot_id: SlotId,
    /// Whether the slot is occupied.
    pub in_use: bool,
}

/// Partial field overwrite for the admin update escape hatch.
///
/// Fields left `None` are unchanged. This is manual correction tooling,
/// not part of the normal lease flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotPatch {
    /// Attach or replace the underlying runner id.
    pub runner_id: Option<RunnerId>,
    /// Replace the owning platform identity.
    pub owner: Option<String>,
    /// Forcibly replace the occupancy state, lease data included.
    pub status: Option<SlotStatus>,
}

impl SlotPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.runner_id.is_none() && self.owner.is_none() && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lease_at(epoch_secs: i64, duration_secs: u64) -> Lease {
        Lease {
            user: UserId::new(),
            project: ProjectId::new(),
            started_at: DateTime::<Utc>::from_timestamp(epoch_secs, 0).unwrap(),
            duration_secs,
            start_cycles: 0,
        }
    }

    #[test]
    fn lease_expiry_boundary() {
        let lease = lease_at(0, 3600);
        let just_before = DateTime::<Utc>::from_timestamp(3599, 0).unwrap();
        let at_expiry = DateTime::<Utc>::from_timestamp(3600, 0).unwrap();

        assert!(!lease.is_expired(just_before));
        assert!(lease.is_expired(at_expiry));
        assert_eq!(lease.remaining_secs(just_before), 1);
        assert_eq!(lease.remaining_secs(at_expiry), 0);
    }

    #[test]
    fn occupied_status_always_carries_lease() {
        let status = SlotStatus::Occupied {
            lease: lease_at(0, 60),
        };
        assert!(!status.is_available());
        assert!(status.lease().is_some());
        assert!(SlotStatus::Available.lease().is_none());
    }

    #[test]
    fn status_serializes_with_tag() {
        let json = serde_json::to_value(SlotStatus::Available).expect("serialize");
        assert_eq!(json["status"], "available");

        let json = serde_json::to_value(SlotStatus::Occupied {
            lease: lease_at(0, 60),
        })
        .expect("serialize");
        assert_eq!(json["status"], "occupied");
        assert!(json["lease"].is_object());
    }
}
