//! Integration tests driving the leasing core through the HTTP router.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use runnerhub_api::{AppState, build_router};
use runnerhub_core::clock::{Clock, ManualClock};
use runnerhub_core::config::AppConfig;
use runnerhub_core::traits::NoopCycleMeter;
use runnerhub_lease::{AdminControl, LeaseAllocator, LeaseTerm, QuotaTracker, Reclaimer};
use runnerhub_store::{MemorySlotStore, MemoryUsageStore, SlotStore, UsageStore};

struct TestApp {
    router: Router,
    clock: Arc<ManualClock>,
}

impl TestApp {
    fn new(config: AppConfig) -> Self {
        let clock = Arc::new(ManualClock::at_epoch());
        let slots: Arc<dyn SlotStore> = Arc::new(MemorySlotStore::provision(
            config.pool.size,
            &config.pool.owner,
            clock.now(),
        ));
        let usage: Arc<dyn UsageStore> = Arc::new(MemoryUsageStore::new(config.quota.clone()));
        let term = Arc::new(LeaseTerm::new(config.lease.duration_secs));
        let quota = QuotaTracker::new(Arc::clone(&usage));
        let allocator = Arc::new(LeaseAllocator::new(
            Arc::clone(&slots),
            quota.clone(),
            Arc::clone(&term),
            Arc::new(NoopCycleMeter),
            clock.clone(),
        ));
        let reclaimer = Reclaimer::new(Arc::clone(&slots), clock.clone());
        let admin = Arc::new(AdminControl::new(
            Arc::clone(&slots),
            usage,
            term,
            reclaimer,
        ));

        let state = AppState {
            config: Arc::new(config),
            clock: clock.clone(),
            slots,
            quota,
            allocator,
            admin,
        };

        Self {
            router: build_router(state),
            clock,
        }
    }

    async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
        identity: Option<(&str, &str)>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((user, role)) = identity {
            builder = builder.header("x-user-id", user).header("x-user-role", role);
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    async fn request_session(&self, user: &str) -> (StatusCode, serde_json::Value) {
        self.request(
            "POST",
            "/api/sessions",
            Some(serde_json::json!({ "project_id": Uuid::new_v4() })),
            Some((user, "user")),
        )
        .await
    }
}

fn user_id() -> String {
    Uuid::new_v4().to_string()
}

#[tokio::test]
async fn health_endpoint_needs_no_identity() {
    let app = TestApp::new(AppConfig::default());
    let (status, body) = app.request("GET", "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn session_request_grants_first_slot() {
    let app = TestApp::new(AppConfig::default());
    let (status, body) = app.request_session(&user_id()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["slot_id"], 1);
    assert_eq!(body["data"]["duration_secs"], 3600);
    assert!(body["data"]["runner_id"].is_null());
}

#[tokio::test]
async fn missing_identity_is_rejected() {
    let app = TestApp::new(AppConfig::default());
    let (status, body) = app
        .request(
            "POST",
            "/api/sessions",
            Some(serde_json::json!({ "project_id": Uuid::new_v4() })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "AUTHORIZATION");
}

#[tokio::test]
async fn duplicate_session_request_conflicts() {
    let app = TestApp::new(AppConfig::default());
    let user = user_id();

    let (status, _) = app.request_session(&user).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.request_session(&user).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "ALREADY_LEASED");
}

#[tokio::test]
async fn exhausted_pool_returns_service_unavailable() {
    let mut config = AppConfig::default();
    config.pool.size = 1;
    let app = TestApp::new(config);

    app.request_session(&user_id()).await;
    let (status, body) = app.request_session(&user_id()).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "NO_SLOTS_AVAILABLE");
}

#[tokio::test]
async fn quota_denial_is_distinguishable_from_conflicts() {
    let mut config = AppConfig::default();
    config.quota.max_uses_threshold = 1;
    let app = TestApp::new(config);
    let user = user_id();
    let admin = user_id();

    app.request_session(&user).await;
    // Free the slot so only the quota can deny the retry
    let (status, _) = app
        .request(
            "POST",
            "/api/admin/slots/reset",
            None,
            Some((&admin, "admin")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.request_session(&user).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "QUOTA_EXCEEDED");
}

#[tokio::test]
async fn admin_routes_reject_regular_users() {
    let app = TestApp::new(AppConfig::default());
    let (status, _) = app
        .request("GET", "/api/slots", None, Some((&user_id(), "user")))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn purge_reclaims_expired_session_for_reuse() {
    let app = TestApp::new(AppConfig::default());
    let user = user_id();
    let admin = user_id();

    app.request_session(&user).await;
    app.clock.advance_secs(3700);

    let (status, body) = app
        .request(
            "POST",
            "/api/admin/sessions/purge-expired",
            None,
            Some((&admin, "admin")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["reclaimed"], serde_json::json!([1]));

    // The same user can lease again once the slot is back in the pool
    let (status, body) = app.request_session(&user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["slot_id"], 1);
}

#[tokio::test]
async fn duration_override_converts_at_the_boundary() {
    let app = TestApp::new(AppConfig::default());
    let admin = user_id();

    let (status, body) = app
        .request(
            "PUT",
            "/api/admin/duration",
            Some(serde_json::json!({ "duration_ms": 7_200_000_u64 })),
            Some((&admin, "admin")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["previous_ms"], 3_600_000_u64);
    assert_eq!(body["data"]["new_ms"], 7_200_000_u64);

    // Future allocations are stamped with the new duration, in seconds
    let (_, body) = app.request_session(&user_id()).await;
    assert_eq!(body["data"]["duration_secs"], 7200);
}

#[tokio::test]
async fn fractional_second_duration_is_rejected() {
    let app = TestApp::new(AppConfig::default());
    let (status, body) = app
        .request(
            "PUT",
            "/api/admin/duration",
            Some(serde_json::json!({ "duration_ms": 1500 })),
            Some((&user_id(), "admin")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION");
}

#[tokio::test]
async fn usage_projection_combines_lease_and_counters() {
    let app = TestApp::new(AppConfig::default());
    let user = user_id();

    app.request_session(&user).await;
    app.clock.advance_secs(600);

    let (status, body) = app
        .request("GET", "/api/usage", None, Some((&user, "user")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["lease"]["slot_id"], 1);
    assert_eq!(body["data"]["lease"]["remaining_secs"], 3000);
    assert_eq!(body["data"]["usage_count"], 1);
    assert_eq!(body["data"]["quota"]["consumed"], 1);
}

#[tokio::test]
async fn usage_projection_for_new_user_shows_defaults() {
    let app = TestApp::new(AppConfig::default());
    let (status, body) = app
        .request("GET", "/api/usage", None, Some((&user_id(), "user")))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["lease"].is_null());
    assert_eq!(body["data"]["usage_count"], 0);
    assert!(body["data"]["last_used"].is_null());
}

#[tokio::test]
async fn admin_can_attach_runner_to_slot() {
    let app = TestApp::new(AppConfig::default());
    let runner = Uuid::new_v4();

    let (status, body) = app
        .request(
            "PATCH",
            "/api/admin/slots/1",
            Some(serde_json::json!({ "runner_id": runner })),
            Some((&user_id(), "admin")),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["runner_id"], runner.to_string());
}

#[tokio::test]
async fn unknown_slot_update_is_not_found() {
    let app = TestApp::new(AppConfig::default());
    let (status, body) = app
        .request(
            "PATCH",
            "/api/admin/slots/999",
            Some(serde_json::json!({ "owner": "ops" })),
            Some((&user_id(), "admin")),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "SLOT_NOT_FOUND");
}
