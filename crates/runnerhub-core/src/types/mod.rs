//! Shared domain types.

pub mod id;

pub use id::{ProjectId, RunnerId, SlotId, UserId};
