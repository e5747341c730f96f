//! Admin control handlers.
//!
//! Every destructive operation here is global and irreversible; the
//! excluded UI confirms with the operator before calling.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use runnerhub_core::types::{SlotId, UserId};
use runnerhub_entity::pool::PoolStats;
use runnerhub_entity::slot::{Slot, SlotPatch};
use runnerhub_entity::usage::UsageLog;
use runnerhub_lease::PurgeReport;

use crate::dto::{ApiResponse, CountResponse, DurationChangeResponse, SetDurationBody};
use crate::error::ApiError;
use crate::extractors::CallerIdentity;
use crate::state::AppState;

/// PUT /api/admin/duration
///
/// Milliseconds on the wire, seconds in the core; this is the single
/// conversion point.
pub async fn set_duration(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(body): Json<SetDurationBody>,
) -> Result<Json<ApiResponse<DurationChangeResponse>>, ApiError> {
    caller.require_admin()?;
    let change = state.admin.set_duration(body.duration_secs()?).await?;
    Ok(Json(ApiResponse::ok(change.into())))
}

/// POST /api/admin/slots/reset
pub async fn reset_slots(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    caller.require_admin()?;
    let count = state.admin.reset_all_slots().await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// POST /api/admin/sessions/purge-expired
pub async fn purge_expired(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<ApiResponse<PurgeReport>>, ApiError> {
    caller.require_admin()?;
    let report = state.admin.purge_expired().await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// DELETE /api/admin/usage-logs
pub async fn delete_usage_logs(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    caller.require_admin()?;
    let count = state.admin.delete_usage_logs().await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// GET /api/admin/usage-logs
pub async fn list_usage_logs(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<ApiResponse<Vec<UsageLog>>>, ApiError> {
    caller.require_admin()?;
    let logs = state.admin.list_usage_logs().await?;
    Ok(Json(ApiResponse::ok(logs)))
}

/// POST /api/admin/usage-logs/{user}/reset-window
pub async fn reset_user_window(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(user): Path<Uuid>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    caller.require_admin()?;
    let existed = state.admin.reset_window(UserId::from(user)).await?;
    Ok(Json(ApiResponse::ok(existed)))
}

/// PATCH /api/admin/slots/{id}
pub async fn update_slot(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<i64>,
    Json(patch): Json<SlotPatch>,
) -> Result<Json<ApiResponse<Slot>>, ApiError> {
    caller.require_admin()?;
    let slot = state.admin.update_slot(SlotId(id), patch).await?;
    Ok(Json(ApiResponse::ok(slot)))
}

/// GET /api/admin/pool/stats
pub async fn pool_stats(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<ApiResponse<PoolStats>>, ApiError> {
    caller.require_admin()?;
    let stats = state.admin.pool_stats().await?;
    Ok(Json(ApiResponse::ok(stats)))
}
