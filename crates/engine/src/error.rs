//! Engine-level error type.

use dealflow_core::CoreError;

/// Failure of an engine operation.
///
/// Business-rule violations ([`CoreError`]) and store faults
/// ([`sqlx::Error`]) stay in separate variants so callers can map the
/// former to client errors and the latter to opaque server errors without
/// inspecting message strings.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
