//! # runnerhub-store
//!
//! The authoritative shared-state layer: the [`SlotStore`] and
//! [`UsageStore`] traits plus the in-memory single-node implementations.
//! Stores are always injected (`Arc<dyn SlotStore>`), never global.

pub mod memory;
pub mod slot_store;
pub mod usage_store;

pub use memory::{MemorySlotStore, MemoryUsageStore};
pub use slot_store::SlotStore;
pub use usage_store::UsageStore;
