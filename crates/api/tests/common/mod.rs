//! Shared helpers for API integration tests.
//!
//! Builds the application router exactly as `main.rs` does (via
//! [`build_app_router`]) so every test exercises the production middleware
//! stack, plus small request/response helpers and party seeders.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use dealflow_api::config::ServerConfig;
use dealflow_api::router::build_app_router;
use dealflow_api::state::AppState;
use dealflow_core::types::DbId;
use dealflow_db::models::party::{CreateAdvisor, CreateInvestor, CreateStartup};
use dealflow_db::repositories::{AdvisorRepo, InvestorRepo, StartupRepo};
use dealflow_events::EventBus;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router over the given pool.
///
/// The event bus is owned by the returned router's state; published events
/// go nowhere. Use [`build_test_app_with_bus`] when a test needs to drive
/// the persistence pipeline.
pub fn build_test_app(pool: PgPool) -> Router {
    let (app, _bus) = build_test_app_with_bus(pool);
    app
}

/// Build the application router and hand back the event bus alongside it.
///
/// Dropping both the router and the returned bus closes the broadcast
/// channel, which lets a test await an `EventPersistence` task to a clean
/// exit before asserting on persisted rows.
pub fn build_test_app_with_bus(pool: PgPool) -> (Router, Arc<EventBus>) {
    let config = test_config();
    let event_bus = Arc::new(EventBus::default());
    let state = AppState::new(pool, Arc::new(config.clone()), Arc::clone(&event_bus));
    (build_app_router(state, &config), event_bus)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request to the app and return the raw response.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and return the raw response.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

pub async fn seed_advisor(pool: &PgPool, code: &str) -> DbId {
    AdvisorRepo::create(
        pool,
        &CreateAdvisor {
            name: format!("Advisor {code}"),
            code: code.to_string(),
            email: format!("{}@advisors.test", code.to_lowercase()),
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_investor(pool: &PgPool, name: &str, code: Option<&str>, accepted: bool) -> DbId {
    InvestorRepo::create(
        pool,
        &CreateInvestor {
            name: name.to_string(),
            contact_email: format!("{name}@investors.test"),
            contact_phone: None,
            advisor_code_entered: code.map(str::to_string),
            advisor_accepted: Some(accepted),
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_startup(pool: &PgPool, name: &str, code: Option<&str>, accepted: bool) -> DbId {
    StartupRepo::create(
        pool,
        &CreateStartup {
            name: name.to_string(),
            contact_email: format!("{name}@startups.test"),
            contact_phone: None,
            advisor_code_entered: code.map(str::to_string),
            advisor_accepted: Some(accepted),
        },
    )
    .await
    .unwrap()
    .id
}
