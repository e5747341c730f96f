//! In-memory usage log store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, info};

use runnerhub_core::config::quota::QuotaConfig;
use runnerhub_core::result::AppResult;
use runnerhub_core::types::UserId;
use runnerhub_entity::usage::UsageLog;

use crate::usage_store::UsageStore;

/// In-memory usage log store.
///
/// Per-user entries are locked through the `DashMap` entry API, which makes
/// the window-reset read-modify-write in `record` atomic per user.
#[derive(Debug)]
pub struct MemoryUsageStore {
    logs: DashMap<UserId, UsageLog>,
    defaults: QuotaConfig,
}

impl MemoryUsageStore {
    /// Creates an empty store seeding new logs from the given defaults.
    pub fn new(defaults: QuotaConfig) -> Self {
        Self {
            logs: DashMap::new(),
            defaults,
        }
    }
}

#[async_trait]
impl UsageStore for MemoryUsageStore {
    async fn get(&self, user: UserId) -> AppResult<Option<UsageLog>> {
        Ok(self.logs.get(&user).map(|entry| entry.value().clone()))
    }

    async fn list_all(&self) -> AppResult<Vec<UsageLog>> {
        Ok(self.logs.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn record(&self, user: UserId, now: DateTime<Utc>) -> AppResult<UsageLog> {
        let mut entry = self
            .logs
            .entry(user)
            .or_insert_with(|| UsageLog::new(user, &self.defaults));
        let log = entry.value_mut();

        if log.window_elapsed(now) {
            debug!(user = %user, "Rate-limit window elapsed, resetting usage count");
            log.usage_count = 0;
        }

        log.usage_count += 1;
        log.quota.consumed += 1;
        log.last_used = Some(now);
        log.is_active = true;

        Ok(log.clone())
    }

    async fn reset_window(&self, user: UserId) -> AppResult<bool> {
        match self.logs.get_mut(&user) {
            Some(mut entry) => {
                let log = entry.value_mut();
                log.usage_count = 0;
                log.is_active = false;
                info!(user = %user, "Usage window reset by admin");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let count = self.logs.len() as u64;
        self.logs.clear();
        info!(deleted = count, "All usage logs deleted");
        Ok(count)
    }
}
