//! Route definitions for the RunnerHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. The router
//! receives `AppState` and passes it to all handlers via Axum's `State`
//! extractor.

use axum::http::HeaderValue;
use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(session_routes())
        .merge(slot_routes())
        .merge(admin_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Session and usage endpoints for freemium users.
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(handlers::sessions::request_session))
        .route("/usage", get(handlers::usage::get_usage))
}

/// Slot listing endpoints for admin dashboards.
fn slot_routes() -> Router<AppState> {
    Router::new()
        .route("/slots", get(handlers::slots::list_slots))
        .route("/slots/available", get(handlers::slots::list_available))
        .route("/slots/used", get(handlers::slots::list_used))
}

/// Admin control endpoints. All destructive operations are separately
/// named so irreversibility is visible at the call site.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/duration", put(handlers::admin::set_duration))
        .route("/admin/slots/reset", post(handlers::admin::reset_slots))
        .route(
            "/admin/sessions/purge-expired",
            post(handlers::admin::purge_expired),
        )
        .route(
            "/admin/usage-logs",
            delete(handlers::admin::delete_usage_logs),
        )
        .route("/admin/usage-logs", get(handlers::admin::list_usage_logs))
        .route(
            "/admin/usage-logs/{user}/reset-window",
            post(handlers::admin::reset_user_window),
        )
        .route("/admin/slots/{id}", patch(handlers::admin::update_slot))
        .route("/admin/pool/stats", get(handlers::admin::pool_stats))
}

/// Health endpoints.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// CORS layer from configuration. An empty origin list allows any origin.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let origins = &state.config.server.cors_allowed_origins;
    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
