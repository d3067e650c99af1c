//! HTTP API tests
//!
//! Drives `/api/*` through actix test services, with the request id
//! middleware wrapped the same way the server does.

use std::sync::{Arc, Once};

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::{Value, json};
use tempfile::TempDir;

use clickstream_analytics::analytics::{
    EventRecord, EventType, FixedClock, NewEvent, SessionRecord, UserRecord, WeekStart,
};
use clickstream_analytics::api::middleware::RequestIdMiddleware;
use clickstream_analytics::api::services::api_routes;
use clickstream_analytics::config::init_config;
use clickstream_analytics::errors::{AnalyticsError, Result};
use clickstream_analytics::services::{AnalyticsService, EventService, JourneyService, UserService};
use clickstream_analytics::storage::{AnalyticsStore, SeaOrmStorage};

// =============================================================================
// Test Setup
// =============================================================================

static INIT: Once = Once::new();

fn init_static_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn create_temp_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    init_static_config();
    let td = TempDir::new().unwrap();
    let p = td.path().join("api_test.db");
    let u = format!("sqlite://{}?mode=rwc", p.display());
    let s = SeaOrmStorage::new(&u, "sqlite").await.unwrap();
    (Arc::new(s), td)
}

/// Store whose backend is always down
struct UnavailableStore;

fn down<T>() -> Result<T> {
    Err(AnalyticsError::store_unavailable(
        "connection refused (os error 111)",
    ))
}

#[async_trait]
impl AnalyticsStore for UnavailableStore {
    async fn sessions_for_user(
        &self,
        _user_id: &str,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<SessionRecord>> {
        down()
    }

    async fn events_for_sessions(
        &self,
        _user_id: &str,
        _session_ids: &[String],
    ) -> Result<Vec<EventRecord>> {
        down()
    }

    async fn sessions_started_between(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<SessionRecord>> {
        down()
    }

    async fn events_for_session_ids(&self, _session_ids: &[String]) -> Result<Vec<EventRecord>> {
        down()
    }

    async fn events_between(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
        _event_types: Option<&[EventType]>,
    ) -> Result<Vec<EventRecord>> {
        down()
    }

    async fn search_users(&self, _query: &str, _limit: u64) -> Result<Vec<UserRecord>> {
        down()
    }

    async fn search_user_sessions(
        &self,
        _user_id: &str,
        _query: &str,
        _limit: u64,
    ) -> Result<Vec<SessionRecord>> {
        down()
    }

    async fn insert_event(&self, _event: NewEvent) -> Result<i64> {
        down()
    }

    async fn ping(&self) -> Result<()> {
        down()
    }

    fn backend_name(&self) -> &str {
        "unavailable"
    }
}

struct TestServices {
    store: Arc<dyn AnalyticsStore>,
    journey: Arc<JourneyService>,
    analytics: Arc<AnalyticsService>,
    users: Arc<UserService>,
    events: Arc<EventService>,
}

fn services(store: Arc<dyn AnalyticsStore>) -> TestServices {
    let clock = Arc::new(FixedClock(
        DateTime::<FixedOffset>::parse_from_rfc3339("2025-03-12T15:00:00+00:00").unwrap(),
    ));
    TestServices {
        journey: Arc::new(JourneyService::new(store.clone())),
        analytics: Arc::new(AnalyticsService::new(
            store.clone(),
            clock.clone(),
            WeekStart::Sunday,
        )),
        users: Arc::new(UserService::new(store.clone(), 20, 100)),
        events: Arc::new(EventService::new(store.clone(), clock)),
        store,
    }
}

macro_rules! test_app {
    ($services:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware::new(true))
                .app_data(web::Data::new($services.store.clone()))
                .app_data(web::Data::new($services.journey.clone()))
                .app_data(web::Data::new($services.analytics.clone()))
                .app_data(web::Data::new($services.users.clone()))
                .app_data(web::Data::new($services.events.clone()))
                .service(api_routes()),
        )
        .await
    };
}

fn get(uri: &str) -> TestRequest {
    TestRequest::get()
        .uri(uri)
        .insert_header(("x-request-id", "req-test-1"))
}

// =============================================================================
// Request id
// =============================================================================

#[actix_rt::test]
async fn test_missing_request_id_is_rejected() {
    let (storage, _td) = create_temp_storage().await;
    let svc = services(storage);
    let app = test_app!(svc);

    let req = TestRequest::get()
        .uri("/api/analytics/traffic?period=today")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1040);
    assert!(body["message"].as_str().unwrap().contains("x-request-id"));
}

#[actix_rt::test]
async fn test_request_id_is_echoed() {
    let (storage, _td) = create_temp_storage().await;
    let svc = services(storage);
    let app = test_app!(svc);

    let resp = test::call_service(&app, get("/api/analytics/search?period=today").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("x-request-id").unwrap().to_str().unwrap(),
        "req-test-1"
    );
}

#[actix_rt::test]
async fn test_health_skips_request_id_check() {
    let (storage, _td) = create_temp_storage().await;
    let svc = services(storage);
    let app = test_app!(svc);

    let req = TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    // 未携带时生成一个
    assert!(resp.headers().contains_key("x-request-id"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["status"], "ok");
}

// =============================================================================
// Analytics
// =============================================================================

#[actix_rt::test]
async fn test_invalid_period_returns_400() {
    let (storage, _td) = create_temp_storage().await;
    let svc = services(storage);
    let app = test_app!(svc);

    let resp = test::call_service(
        &app,
        get("/api/analytics/revenue-and-conversion?period=invalid_token").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 6001);
    assert!(body["message"].as_str().unwrap().contains("invalid_token"));
    assert!(body["data"].is_null());

    let resp = test::call_service(&app, get("/api/analytics/traffic").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 6001);
    assert!(body["message"].as_str().unwrap().contains("'period'"));
}

#[actix_rt::test]
async fn test_empty_window_report_is_zeroed() {
    let (storage, _td) = create_temp_storage().await;
    let svc = services(storage);
    let app = test_app!(svc);

    let resp = test::call_service(
        &app,
        get("/api/analytics/revenue-and-conversion?period=last_7_days").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["revenueStats"]["orders"], 0);
    assert_eq!(body["data"]["ordersOverTime"], json!([]));
    assert_eq!(body["data"]["end"], "2025-03-12T15:00:00Z");
}

#[actix_rt::test]
async fn test_store_failure_hides_details() {
    let svc = services(Arc::new(UnavailableStore));
    let app = test_app!(svc);

    let resp = test::call_service(
        &app,
        get("/api/analytics/user-behavior-and-funnel?period=this_week").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 6000);
    assert_eq!(body["message"], "Storage unavailable");
}

// =============================================================================
// Users
// =============================================================================

#[actix_rt::test]
async fn test_journey_without_sessions_returns_default() {
    let (storage, _td) = create_temp_storage().await;
    let svc = services(storage);
    let app = test_app!(svc);

    let resp = test::call_service(
        &app,
        get("/api/users/nobody/journeys?from=2025-03-01&to=2025-03-31").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["data"],
        json!({ "sessions": [], "totalPurchaseAmount": 0.0, "totalPurchaseItems": 0 })
    );
}

#[actix_rt::test]
async fn test_journey_rejects_bad_dates() {
    let (storage, _td) = create_temp_storage().await;
    let svc = services(storage);
    let app = test_app!(svc);

    let resp = test::call_service(
        &app,
        get("/api/users/u1/journeys?from=yesterday&to=2025-03-31").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 6002);
    assert!(body["message"].as_str().unwrap().contains("'from'"));

    let resp = test::call_service(
        &app,
        get("/api/users/u1/journeys?from=2025-03-31&to=2025-03-01").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_search_requires_query() {
    let (storage, _td) = create_temp_storage().await;
    let svc = services(storage);
    let app = test_app!(svc);

    let resp = test::call_service(&app, get("/api/users/search?limit=5").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);

    let resp = test::call_service(&app, get("/api/users/search?query=jo").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"], json!([]));
}

// =============================================================================
// Events
// =============================================================================

#[actix_rt::test]
async fn test_post_event_returns_created() {
    let (storage, _td) = create_temp_storage().await;
    let svc = services(storage.clone());
    let app = test_app!(svc);

    let req = TestRequest::post()
        .uri("/api/events")
        .insert_header(("x-request-id", "req-post"))
        .set_json(json!({
            "userId": "u1",
            "sessionId": "s1",
            "eventType": "SEARCH",
            "page": "/search",
            "metadata": { "query": "red shoes", "resultCount": 0 }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let event_id = body["data"]["eventId"].as_i64().unwrap();

    let events = storage
        .events_for_session_ids(&["s1".to_string()])
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, event_id);
    assert_eq!(events[0].metadata.text("query"), Some("red shoes"));
}

#[actix_rt::test]
async fn test_post_event_validation() {
    let (storage, _td) = create_temp_storage().await;
    let svc = services(storage);
    let app = test_app!(svc);

    let req = TestRequest::post()
        .uri("/api/events")
        .insert_header(("x-request-id", "req-post"))
        .set_json(json!({ "userId": "u1", "sessionId": "s1", "eventType": "CLICK", "page": "/" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);
    assert!(body["message"].as_str().unwrap().contains("eventType"));

    let req = TestRequest::post()
        .uri("/api/events")
        .insert_header(("x-request-id", "req-post"))
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);
}

// =============================================================================
// Health
// =============================================================================

#[actix_rt::test]
async fn test_health_reports_degraded_store() {
    let svc = services(Arc::new(UnavailableStore));
    let app = test_app!(svc);

    let resp = test::call_service(&app, get("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1030);
    assert_eq!(body["data"]["status"], "degraded");
}
