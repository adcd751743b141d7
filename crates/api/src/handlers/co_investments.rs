//! Handlers for the co-investment pipeline (PRD-15).
//!
//! Provides endpoints for listing a co-investment opportunity, walking its
//! approval chain, closing it, and for participant offers against it with
//! their own three-step decision chain.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use dealflow_core::error::CoreError;
use dealflow_core::gate::Decision;
use dealflow_core::types::DbId;
use dealflow_db::models::co_offer::CreateCoInvestmentOffer;
use dealflow_db::models::opportunity::{
    CapacitySummary, CoInvestmentOpportunity, CreateCoInvestmentOpportunity,
};
use dealflow_db::repositories::{CoOfferRepo, OpportunityRepo};
use dealflow_engine::{CoOfferActor, OpportunityActor};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Request body for a decision on an opportunity listing. The actor's
/// identity fields ride alongside `decision` in the same object.
#[derive(Debug, Deserialize)]
pub struct DecideOpportunityRequest {
    #[serde(flatten)]
    pub actor: OpportunityActor,
    pub decision: Decision,
}

/// Request body for the lead investor closing their listing.
#[derive(Debug, Deserialize)]
pub struct CloseOpportunityRequest {
    pub investor_id: DbId,
}

/// Request body for a decision on a co-investment offer.
#[derive(Debug, Deserialize)]
pub struct DecideCoOfferRequest {
    #[serde(flatten)]
    pub actor: CoOfferActor,
    pub decision: Decision,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// An opportunity listing together with its live capacity numbers.
#[derive(Debug, Serialize)]
pub struct OpportunityDetail {
    #[serde(flatten)]
    pub opportunity: CoInvestmentOpportunity,
    pub capacity: CapacitySummary,
}

// ---------------------------------------------------------------------------
// Opportunity handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/co-investments/opportunities
///
/// List a co-investment opportunity. The lead's own slice and the per-offer
/// bounds are validated structurally before anything is persisted.
pub async fn create_opportunity(
    State(state): State<AppState>,
    Json(input): Json<CreateCoInvestmentOpportunity>,
) -> AppResult<impl IntoResponse> {
    let opportunity = state.opportunities.create(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: opportunity }),
    ))
}

/// GET /api/v1/co-investments/opportunities/{id}
///
/// Fetch an opportunity listing with its capacity summary.
pub async fn get_opportunity(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let opportunity = OpportunityRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "co_investment_opportunity",
            id,
        })?;
    let capacity = state.opportunities.capacity(id).await?;

    Ok(Json(DataResponse {
        data: OpportunityDetail {
            opportunity,
            capacity,
        },
    }))
}

/// POST /api/v1/co-investments/opportunities/{id}/decide
///
/// Record a decision in the listing's approval chain: the lead investor's
/// advisor at stage 1, the startup's advisor at stage 2, or the startup
/// itself at any stage.
pub async fn decide_opportunity(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<DecideOpportunityRequest>,
) -> AppResult<impl IntoResponse> {
    let opportunity = state
        .opportunities
        .decide(id, input.actor, input.decision)
        .await?;
    Ok(Json(DataResponse { data: opportunity }))
}

/// POST /api/v1/co-investments/opportunities/{id}/close
///
/// The lead investor withdraws an active listing.
pub async fn close_opportunity(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CloseOpportunityRequest>,
) -> AppResult<impl IntoResponse> {
    let opportunity = state.opportunities.close(id, input.investor_id).await?;
    Ok(Json(DataResponse { data: opportunity }))
}

/// GET /api/v1/co-investments/opportunities/{id}/offers
///
/// List every co-investment offer made against an opportunity, oldest first.
pub async fn list_opportunity_offers(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    OpportunityRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "co_investment_opportunity",
            id,
        })?;

    let offers = CoOfferRepo::list_for_opportunity(&state.pool, id).await?;
    Ok(Json(DataResponse { data: offers }))
}

// ---------------------------------------------------------------------------
// Co-offer handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/co-investments/offers
///
/// A participant investor asks to join a fully-approved opportunity. The
/// amount must sit within the listing's per-offer bounds; capacity itself
/// is enforced when the startup accepts.
pub async fn create_co_offer(
    State(state): State<AppState>,
    Json(input): Json<CreateCoInvestmentOffer>,
) -> AppResult<impl IntoResponse> {
    let offer = state.co_offers.create(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: offer })))
}

/// POST /api/v1/co-investments/offers/{id}/decide
///
/// Record a decision at the co-offer's current chain step: the participant's
/// advisor, then the lead investor, then the startup.
pub async fn decide_co_offer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<DecideCoOfferRequest>,
) -> AppResult<impl IntoResponse> {
    let offer = state.co_offers.decide(id, input.actor, input.decision).await?;
    Ok(Json(DataResponse { data: offer }))
}
