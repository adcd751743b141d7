//! Pins the `AppError` wire contract: status code, `code` field, and
//! message for every variant. No server involved; `IntoResponse` is
//! called directly.

use axum::response::IntoResponse;
use http_body_util::BodyExt;
use rust_decimal_macros::dec;

use dealflow_api::error::AppError;
use dealflow_core::error::CoreError;
use dealflow_engine::EngineError;

/// Render an error and hand back its status plus decoded JSON body.
async fn error_to_response(err: AppError) -> (axum::http::StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

// ---------------------------------------------------------------------------
// Test: CoreError::NotAuthorized maps to 403 with NOT_AUTHORIZED code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_authorized_error_returns_403() {
    let err = AppError::Core(CoreError::NotAuthorized(
        "advisor 5 holds no gate on offer 9".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "NOT_AUTHORIZED");
    assert_eq!(json["error"], "advisor 5 holds no gate on offer 9");
}

// ---------------------------------------------------------------------------
// Test: CoreError::InvalidState maps to 409 with INVALID_STATE code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_state_error_returns_409() {
    let err = AppError::Core(CoreError::InvalidState("offer is already accepted".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_STATE");
    assert_eq!(json["error"], "offer is already accepted");
}

// ---------------------------------------------------------------------------
// Test: CoreError::InvalidTerms maps to 422 with INVALID_TERMS code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_terms_error_returns_422() {
    let err = AppError::Core(CoreError::InvalidTerms(
        "maximum_co_investment exceeds investment_amount".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "INVALID_TERMS");
    assert_eq!(
        json["error"],
        "maximum_co_investment exceeds investment_amount"
    );
}

// ---------------------------------------------------------------------------
// Test: CoreError::CapacityExceeded maps to 409 with the amounts spelled out
// ---------------------------------------------------------------------------

#[tokio::test]
async fn capacity_exceeded_error_returns_409() {
    let err = AppError::Core(CoreError::CapacityExceeded {
        requested: dec!(60000),
        remaining: dec!(50000),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "CAPACITY_EXCEEDED");
    assert_eq!(
        json["error"],
        "Capacity exceeded: requested 60000, remaining 50000"
    );
}

// ---------------------------------------------------------------------------
// Test: CoreError::NotFound maps to 404 with NOT_FOUND code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "offer",
        id: 77,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "offer with id 77 not found");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Validation maps to 400 with VALIDATION_ERROR code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("offer amount must be positive".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "offer amount must be positive");
}

// ---------------------------------------------------------------------------
// Test: AppError::BadRequest maps to 400 with BAD_REQUEST code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("decision must be approve or reject".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "decision must be approve or reject");
}

// ---------------------------------------------------------------------------
// Test: AppError::InternalError maps to 500 and sanitizes the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("postgres password hunter2 in DSN".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");

    // Whatever went into the variant stays out of the body.
    assert!(
        !json.to_string().contains("hunter2"),
        "internal details leaked into the response"
    );
}

// ---------------------------------------------------------------------------
// Test: sqlx::Error::RowNotFound maps to 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sqlx_row_not_found_returns_404() {
    let err = AppError::Database(sqlx::Error::RowNotFound);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Resource not found");
}

// ---------------------------------------------------------------------------
// Test: other database errors map to 500 without leaking details
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sqlx_pool_error_returns_500_and_sanitizes() {
    let err = AppError::Database(sqlx::Error::PoolTimedOut);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Test: EngineError variants convert and map through
// ---------------------------------------------------------------------------

#[tokio::test]
async fn engine_error_converts_to_matching_response() {
    let engine_err = EngineError::Core(CoreError::InvalidState("opportunity is closed".into()));
    let (status, json) = error_to_response(AppError::from(engine_err)).await;
    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_STATE");

    let engine_err = EngineError::Database(sqlx::Error::RowNotFound);
    let (status, json) = error_to_response(AppError::from(engine_err)).await;
    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}
