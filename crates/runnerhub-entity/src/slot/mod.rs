//! Slot entity and lease value types.

pub mod model;

pub use model::{Lease, Slot, SlotOccupancy, SlotPatch, SlotStatus};
