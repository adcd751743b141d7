use rust_decimal::Decimal;

use crate::types::DbId;

/// Business-rule failures surfaced by the approval engines.
///
/// Every variant is a local, synchronous, non-retryable rule violation.
/// Transport and store failures (`sqlx::Error`) are deliberately kept out of
/// this enum so callers can tell a rule violation from a transient fault and
/// never blindly retry a `NotAuthorized`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The actor's role has no actionable gate in the entity's current state
    /// (already decided, gate not required, or wrong role).
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// The requested operation is not legal from the entity's current
    /// stage/status. The caller must re-fetch before retrying.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Entity creation violates a structural invariant. Nothing is persisted.
    #[error("Invalid terms: {0}")]
    InvalidTerms(String),

    /// An accept would overdraw the co-investment capacity of an
    /// opportunity. The accepting transaction is aborted.
    #[error("Capacity exceeded: requested {requested}, remaining {remaining}")]
    CapacityExceeded {
        requested: Decimal,
        remaining: Decimal,
    },

    /// A referenced entity, party, or advisor relationship does not resolve.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed input that never reached the state machines.
    #[error("Validation failed: {0}")]
    Validation(String),
}
