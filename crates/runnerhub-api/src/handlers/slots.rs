//! Slot listing handlers for admin dashboards.

use axum::Json;
use axum::extract::State;

use runnerhub_entity::slot::{Slot, SlotOccupancy};

use crate::dto::ApiResponse;
use crate::error::ApiError;
use crate::extractors::CallerIdentity;
use crate::state::AppState;

/// GET /api/slots
pub async fn list_slots(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<ApiResponse<Vec<Slot>>>, ApiError> {
    caller.require_admin()?;
    let slots = state.slots.list_all().await?;
    Ok(Json(ApiResponse::ok(slots)))
}

/// GET /api/slots/available
pub async fn list_available(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<ApiResponse<Vec<Slot>>>, ApiError> {
    caller.require_admin()?;
    let slots = state.slots.list_available().await?;
    Ok(Json(ApiResponse::ok(slots)))
}

/// GET /api/slots/used
pub async fn list_used(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<ApiResponse<Vec<SlotOccupancy>>>, ApiError> {
    caller.require_admin()?;
    let occupancy = state.slots.list_used().await?;
    Ok(Json(ApiResponse::ok(occupancy)))
}
