//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use runnerhub_core::config::pool::PoolConfig;
use runnerhub_core::config::worker::WorkerConfig;
use runnerhub_core::error::AppError;
use runnerhub_lease::{AdminControl, Reclaimer};

/// Cron-based scheduler for periodic background tasks.
pub struct MaintenanceScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
    /// Expiry reclamation service invoked by the purge job.
    reclaimer: Arc<Reclaimer>,
    /// Admin control surface used for pool stats observation.
    admin: Arc<AdminControl>,
    /// Worker schedules.
    config: WorkerConfig,
    /// Pool thresholds for stats logging.
    pool_config: PoolConfig,
}

impl std::fmt::Debug for MaintenanceScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaintenanceScheduler").finish()
    }
}

impl MaintenanceScheduler {
    /// Create a new maintenance scheduler.
    pub async fn new(
        reclaimer: Arc<Reclaimer>,
        admin: Arc<AdminControl>,
        config: WorkerConfig,
        pool_config: PoolConfig,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            reclaimer,
            admin,
            config,
            pool_config,
        })
    }

    /// Register all default scheduled tasks.
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_expiry_purge().await?;
        self.register_pool_stats().await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Maintenance scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Maintenance scheduler shut down");
        Ok(())
    }

    /// Expired-lease purge on the configured schedule.
    async fn register_expiry_purge(&self) -> Result<(), AppError> {
        let reclaimer = Arc::clone(&self.reclaimer);
        let job = CronJob::new_async(self.config.purge_schedule.as_str(), move |_uuid, _lock| {
            let reclaimer = Arc::clone(&reclaimer);
            Box::pin(async move {
                tracing::debug!("Running scheduled expiry purge");
                match reclaimer.purge_expired().await {
                    Ok(report) if report.reclaimed.is_empty() && report.failed.is_empty() => {}
                    Ok(report) => {
                        tracing::info!(
                            reclaimed = report.reclaimed.len(),
                            failed = report.failed.len(),
                            "Scheduled purge reclaimed expired sessions"
                        );
                    }
                    Err(e) => {
                        tracing::error!("Scheduled expiry purge failed: {}", e);
                    }
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create expiry_purge schedule: {}", e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add expiry_purge schedule: {}", e)))?;

        tracing::info!(schedule = %self.config.purge_schedule, "Registered: expiry_purge");
        Ok(())
    }

    /// Pool occupancy observation on the configured schedule.
    async fn register_pool_stats(&self) -> Result<(), AppError> {
        let admin = Arc::clone(&self.admin);
        let warning = self.pool_config.warning_threshold_percent;
        let critical = self.pool_config.critical_threshold_percent;

        let job = CronJob::new_async(self.config.stats_schedule.as_str(), move |_uuid, _lock| {
            let admin = Arc::clone(&admin);
            Box::pin(async move {
                match admin.pool_stats().await {
                    Ok(stats) if stats.is_critical(critical) => {
                        tracing::error!(
                            occupied = stats.occupied,
                            total = stats.total_slots,
                            usage_percent = stats.usage_percent,
                            "Slot pool critically full"
                        );
                    }
                    Ok(stats) if stats.is_warning(warning) => {
                        tracing::warn!(
                            occupied = stats.occupied,
                            total = stats.total_slots,
                            usage_percent = stats.usage_percent,
                            "Slot pool nearing capacity"
                        );
                    }
                    Ok(stats) => {
                        tracing::debug!(
                            occupied = stats.occupied,
                            total = stats.total_slots,
                            "Pool stats observed"
                        );
                    }
                    Err(e) => {
                        tracing::error!("Pool stats observation failed: {}", e);
                    }
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create pool_stats schedule: {}", e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add pool_stats schedule: {}", e)))?;

        tracing::info!(schedule = %self.config.stats_schedule, "Registered: pool_stats");
        Ok(())
    }
}
