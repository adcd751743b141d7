//! Route definitions for advisor-facing views (PRD-07).

use axum::routing::get;
use axum::Router;

use crate::handlers::advisors;
use crate::state::AppState;

/// Advisor routes, nested under `/advisors`.
///
/// ```text
/// GET    /{id}/inbox              get_advisor_inbox
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/inbox", get(advisors::get_advisor_inbox))
}
