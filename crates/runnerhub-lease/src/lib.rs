//! # runnerhub-lease
//!
//! The leasing engine: session allocation, usage quota tracking, expiry
//! reclamation, the platform-wide lease term, and the admin control
//! surface. All shared state is reached through injected stores.

pub mod admin;
pub mod allocator;
pub mod quota;
pub mod reclaim;
pub mod term;

pub use admin::AdminControl;
pub use allocator::{LeaseAllocator, LeaseGrant};
pub use quota::QuotaTracker;
pub use reclaim::{PurgeReport, Reclaimer};
pub use term::{DurationChange, LeaseTerm};
