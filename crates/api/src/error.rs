//! HTTP error mapping.
//!
//! Handlers return [`AppResult`]; every failure funnels through
//! [`AppError::into_response`] so the wire format is uniform:
//! `{"error": <message>, "code": <CODE>}` with a status matching the
//! error class.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dealflow_core::error::CoreError;
use dealflow_engine::EngineError;
use serde_json::json;

/// Everything a handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Domain rule violation surfaced by `dealflow_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Raw sqlx failure that escaped the engines.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Core(core) => AppError::Core(core),
            EngineError::Database(db) => AppError::Database(db),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Status and code for each domain error class.
///
/// State-machine refusals (`InvalidState`, `CapacityExceeded`) are 409s:
/// the request was well-formed but the entity cannot take it right now.
/// Bad terms on a well-formed body are 422, malformed input 400.
fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotAuthorized(msg) => (StatusCode::FORBIDDEN, "NOT_AUTHORIZED", msg.clone()),
        CoreError::InvalidState(msg) => (StatusCode::CONFLICT, "INVALID_STATE", msg.clone()),
        CoreError::InvalidTerms(msg) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "INVALID_TERMS",
            msg.clone(),
        ),
        CoreError::CapacityExceeded { .. } => {
            (StatusCode::CONFLICT, "CAPACITY_EXCEEDED", core.to_string())
        }
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
    }
}

/// Status and code for sqlx failures.
///
/// `RowNotFound` becomes a 404 and a unique-key violation (PostgreSQL
/// 23505) a 409; anything else is logged server-side and reported as an
/// opaque 500 so driver details never reach clients.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    let internal = || {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred".to_string(),
        )
    };

    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                );
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
