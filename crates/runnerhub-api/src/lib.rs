//! # runnerhub-api
//!
//! HTTP surface for the leasing core. Identity is resolved by the external
//! provider; this layer trusts forwarded identity headers, maps domain
//! errors to HTTP statuses, and keeps the single ms↔s conversion boundary
//! in its DTOs.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
