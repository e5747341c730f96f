//! Freemium usage projection handler.

use axum::Json;
use axum::extract::State;

use runnerhub_entity::projection::FreemiumUsage;

use crate::dto::ApiResponse;
use crate::error::ApiError;
use crate::extractors::CallerIdentity;
use crate::state::AppState;

/// GET /api/usage
///
/// Rebuilds the caller's combined slot-and-quota view from scratch on
/// every fetch. Read-only; never a source of truth.
pub async fn get_usage(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<ApiResponse<FreemiumUsage>>, ApiError> {
    let slot = state.slots.find_by_user(caller.user_id).await?;
    let log = state.quota.usage_for(caller.user_id).await?;

    let usage = FreemiumUsage::assemble(
        caller.user_id,
        slot.as_ref(),
        log.as_ref(),
        &state.config.quota,
        state.clock.now(),
    );
    Ok(Json(ApiResponse::ok(usage)))
}
