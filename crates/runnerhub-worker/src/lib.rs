//! # runnerhub-worker
//!
//! Cron-based background maintenance: scheduled expiry purges and pool
//! occupancy observation.

pub mod scheduler;

pub use scheduler::MaintenanceScheduler;
