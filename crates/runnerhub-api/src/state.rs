//! Application state shared across all handlers.

use std::sync::Arc;

use runnerhub_core::clock::Clock;
use runnerhub_core::config::AppConfig;
use runnerhub_lease::{AdminControl, LeaseAllocator, QuotaTracker};
use runnerhub_store::SlotStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Slot pool store.
    pub slots: Arc<dyn SlotStore>,
    /// Usage quota tracker (read side of the usage projection).
    pub quota: QuotaTracker,
    /// Session lease allocator.
    pub allocator: Arc<LeaseAllocator>,
    /// Admin control surface.
    pub admin: Arc<AdminControl>,
}
