//! Client-side read projections.
//!
//! Denormalized views rebuilt from scratch on every fetch. Never a source
//! of truth; the authoritative state stays in the stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use runnerhub_core::config::quota::QuotaConfig;
use runnerhub_core::types::{ProjectId, RunnerId, SlotId, UserId};

use crate::slot::Slot;
use crate::usage::{QuotaAllowance, UsageLog};

/// The caller's active lease, flattened for countdown rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveLeaseView {
    /// The leased slot.
    pub slot_id: SlotId,
    /// The underlying runner, once attached.
    pub runner_id: Option<RunnerId>,
    /// The project the session was requested for.
    pub project_id: ProjectId,
    /// When the lease began.
    pub started_at: DateTime<Utc>,
    /// Lease length in seconds.
    pub duration_secs: u64,
    /// When the lease expires.
    pub expires_at: DateTime<Utc>,
    /// Seconds remaining at projection time.
    pub remaining_secs: u64,
}

/// Combined slot-and-quota view for a freemium user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreemiumUsage {
    /// The caller's active lease, if any.
    pub lease: Option<ActiveLeaseView>,
    /// Lease requests consumed in the current window.
    pub usage_count: u32,
    /// Cap on requests per window.
    pub max_uses_threshold: u32,
    /// Rolling window length in seconds.
    pub rate_limit_window_secs: u64,
    /// Timestamp of the most recent lease request.
    pub last_used: Option<DateTime<Utc>>,
    /// Lifetime allowance.
    pub quota: QuotaAllowance,
}

impl FreemiumUsage {
    /// Assembles the projection from the caller's slot (if any) and usage
    /// log (defaults applied when the user has never made a request).
    pub fn assemble(
        user: UserId,
        slot: Option<&Slot>,
        log: Option<&UsageLog>,
        defaults: &QuotaConfig,
        now: DateTime<Utc>,
    ) -> Self {
        let lease = slot.and_then(|s| {
            s.lease().map(|l| ActiveLeaseView {
                slot_id: s.id,
                runner_id: s.runner_id,
                project_id: l.project,
                started_at: l.started_at,
                duration_secs: l.duration_secs,
                expires_at: l.expires_at(),
                remaining_secs: l.remaining_secs(now),
            })
        });

        match log {
            Some(log) => Self {
                lease,
                usage_count: log.usage_count,
                max_uses_threshold: log.max_uses_threshold,
                rate_limit_window_secs: log.rate_limit_window_secs,
                last_used: log.last_used,
                quota: log.quota,
            },
            None => {
                let fresh = UsageLog::new(user, defaults);
                Self {
                    lease,
                    usage_count: fresh.usage_count,
                    max_uses_threshold: fresh.max_uses_threshold,
                    rate_limit_window_secs: fresh.rate_limit_window_secs,
                    last_used: fresh.last_used,
                    quota: fresh.quota,
                }
            }
        }
    }
}
