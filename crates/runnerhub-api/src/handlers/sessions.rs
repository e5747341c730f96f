//! Session request handlers.

use axum::Json;
use axum::extract::State;

use runnerhub_lease::LeaseGrant;

use crate::dto::{ApiResponse, RequestSessionBody};
use crate::error::ApiError;
use crate::extractors::CallerIdentity;
use crate::state::AppState;

/// POST /api/sessions
///
/// Requests a shared-runner session for the calling user. Denials are
/// typed: 429 when the quota says no, 503 when the pool is exhausted,
/// 409 when the user already holds a session.
pub async fn request_session(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(body): Json<RequestSessionBody>,
) -> Result<Json<ApiResponse<LeaseGrant>>, ApiError> {
    let grant = state
        .allocator
        .allocate(caller.user_id, body.project_id)
        .await?;
    Ok(Json(ApiResponse::ok(grant)))
}
