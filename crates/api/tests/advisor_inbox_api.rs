//! Integration tests for the advisor inbox endpoint (PRD-07).
//!
//! The engine suite covers the split/filter rules per section; these tests
//! pin the JSON shape of the aggregated view and the 404 for unknown
//! advisors.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json, seed_advisor, seed_investor, seed_startup};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: unknown advisor returns 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_advisor_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/advisors/4242/inbox").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: an advisor with no clients gets the empty sections
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn advisor_without_clients_gets_empty_inbox(pool: PgPool) {
    let advisor = seed_advisor(&pool, "ADV-E").await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/advisors/{advisor}/inbox")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].take();
    assert_eq!(data["advisor_id"], advisor);
    assert_eq!(data["investor_side_offers"]["role"], "investor_advisor");
    assert_eq!(data["investor_side_offers"]["pending"], serde_json::json!([]));
    assert_eq!(data["startup_side_offers"]["role"], "startup_advisor");
    assert_eq!(data["startup_side_offers"]["resolved"], serde_json::json!([]));
    assert_eq!(data["co_investment_offers"]["pending"], serde_json::json!([]));
    assert_eq!(data["lead_advisor_opportunities"], serde_json::json!([]));
    assert_eq!(data["startup_advisor_opportunities"], serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// Test: work shows up in the right sections and moves on decision
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn inbox_sections_fill_and_drain_over_http(pool: PgPool) {
    let advisor = seed_advisor(&pool, "ADV-M").await;
    // The same advisor serves an investor and a startup.
    let client_investor = seed_investor(&pool, "Client Capital", Some("ADV-M"), true).await;
    let client_startup = seed_startup(&pool, "Client Labs", Some("ADV-M"), true).await;
    let plain_investor = seed_investor(&pool, "Plain Capital", None, false).await;
    let plain_startup = seed_startup(&pool, "Plain Labs", None, false).await;

    let app = common::build_test_app(pool);

    // An offer from the client investor gates on this advisor's investor side.
    let response = post_json(
        app.clone(),
        "/api/v1/offers",
        serde_json::json!({
            "investor_id": client_investor,
            "startup_id": plain_startup,
            "amount": 250000,
            "equity_percent": 5,
            "currency": "USD"
        }),
    )
    .await;
    let offer_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // A listing led by the client investor queues for the same advisor.
    post_json(
        app.clone(),
        "/api/v1/co-investments/opportunities",
        serde_json::json!({
            "startup_id": plain_startup,
            "lead_investor_id": client_investor,
            "investment_amount": 1000000,
            "minimum_co_investment": 50000,
            "maximum_co_investment": 200000
        }),
    )
    .await;

    // An offer towards the client startup gates on the startup side.
    post_json(
        app.clone(),
        "/api/v1/offers",
        serde_json::json!({
            "investor_id": plain_investor,
            "startup_id": client_startup,
            "amount": 250000,
            "equity_percent": 5,
            "currency": "USD"
        }),
    )
    .await;

    let uri = format!("/api/v1/advisors/{advisor}/inbox");
    let response = get(app.clone(), &uri).await;
    let data = body_json(response).await["data"].take();

    let investor_pending = data["investor_side_offers"]["pending"].as_array().unwrap();
    assert_eq!(investor_pending.len(), 1);
    assert_eq!(investor_pending[0]["id"], offer_id);
    assert_eq!(data["startup_side_offers"]["pending"].as_array().unwrap().len(), 1);
    assert_eq!(data["lead_advisor_opportunities"].as_array().unwrap().len(), 1);

    // Deciding the investor-side gate moves that offer to the audit trail.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/offers/{offer_id}/decide"),
        serde_json::json!({
            "role": "investor_advisor",
            "advisor_id": advisor,
            "decision": "approve"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app, &uri).await;
    let data = body_json(response).await["data"].take();
    assert_eq!(data["investor_side_offers"]["pending"], serde_json::json!([]));
    let resolved = data["investor_side_offers"]["resolved"].as_array().unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0]["id"], offer_id);
    // The startup-side queue is untouched by the investor-side decision.
    assert_eq!(data["startup_side_offers"]["pending"].as_array().unwrap().len(), 1);
}
