//! # runnerhub-entity
//!
//! Domain entity models for RunnerHub. Every struct in this crate
//! represents a stored record or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, and `Deserialize`.

pub mod pool;
pub mod projection;
pub mod slot;
pub mod usage;
