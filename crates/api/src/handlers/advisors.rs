//! Handlers for advisor-facing views (PRD-07).

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use dealflow_core::types::DbId;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/advisors/{id}/inbox
///
/// Aggregate everything awaiting or involving an advisor across both
/// pipelines: offer gates split by side and actionability, co-offer
/// advisor steps, and opportunity queues at the stages they gate.
pub async fn get_advisor_inbox(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let inbox = state.inbox.for_advisor(id).await?;
    Ok(Json(DataResponse { data: inbox }))
}
