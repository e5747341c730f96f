//! RunnerHub Server: shared-runner leasing and usage-quota service
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use runnerhub_core::clock::{Clock, SystemClock};
use runnerhub_core::config::AppConfig;
use runnerhub_core::error::AppError;
use runnerhub_core::traits::NoopCycleMeter;
use runnerhub_lease::{AdminControl, LeaseAllocator, LeaseTerm, QuotaTracker, Reclaimer};
use runnerhub_store::{MemorySlotStore, MemoryUsageStore, SlotStore, UsageStore};
use runnerhub_worker::MaintenanceScheduler;

#[tokio::main]
async fn main() {
    let env = std::env::var("RUNNERHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting RunnerHub v{}", env!("CARGO_PKG_VERSION"));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // ── Step 1: Provision the slot pool ──────────────────────────
    tracing::info!(
        size = config.pool.size,
        owner = %config.pool.owner,
        "Provisioning slot pool"
    );
    let slots: Arc<dyn SlotStore> = Arc::new(MemorySlotStore::provision(
        config.pool.size,
        &config.pool.owner,
        clock.now(),
    ));
    let usage: Arc<dyn UsageStore> = Arc::new(MemoryUsageStore::new(config.quota.clone()));

    // ── Step 2: Build the leasing engine ─────────────────────────
    let term = Arc::new(LeaseTerm::new(config.lease.duration_secs));
    let quota = QuotaTracker::new(Arc::clone(&usage));
    let allocator = Arc::new(LeaseAllocator::new(
        Arc::clone(&slots),
        quota.clone(),
        Arc::clone(&term),
        Arc::new(NoopCycleMeter),
        Arc::clone(&clock),
    ));
    let reclaimer = Arc::new(Reclaimer::new(Arc::clone(&slots), Arc::clone(&clock)));
    let admin = Arc::new(AdminControl::new(
        Arc::clone(&slots),
        Arc::clone(&usage),
        Arc::clone(&term),
        (*reclaimer).clone(),
    ));

    // ── Step 3: Start the maintenance scheduler ──────────────────
    let scheduler = if config.worker.enabled {
        let scheduler = MaintenanceScheduler::new(
            Arc::clone(&reclaimer),
            Arc::clone(&admin),
            config.worker.clone(),
            config.pool.clone(),
        )
        .await?;
        scheduler.register_default_tasks().await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 4: Build and start the HTTP server ──────────────────
    let app_state = runnerhub_api::state::AppState {
        config: Arc::new(config.clone()),
        clock,
        slots,
        quota,
        allocator,
        admin,
    };

    let app = runnerhub_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("RunnerHub server listening on {}", addr);

    // ── Step 5: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    if let Some(mut scheduler) = scheduler {
        scheduler.shutdown().await?;
    }

    tracing::info!("RunnerHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
