//! Handlers for the regular offer pipeline (PRD-12).
//!
//! Provides endpoints for creating an offer, reading it with its gated
//! contact block, applying advisor and startup decisions, fast-forwarding,
//! revealing contact details, and listing the offer's audit trail.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use dealflow_core::error::CoreError;
use dealflow_core::gate::Decision;
use dealflow_core::offer::OfferRole;
use dealflow_core::types::DbId;
use dealflow_db::models::offer::{CreateOffer, Offer};
use dealflow_db::models::party::{Investor, Startup};
use dealflow_db::repositories::{DomainEventRepo, InvestorRepo, OfferRepo, StartupRepo};
use dealflow_engine::OfferParty;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Request body for an advisor decision on an offer gate.
#[derive(Debug, Deserialize)]
pub struct DecideOfferRequest {
    pub role: OfferRole,
    pub advisor_id: DbId,
    pub decision: Decision,
}

/// Request body for the startup's acceptance at the final stage.
#[derive(Debug, Deserialize)]
pub struct AcceptOfferRequest {
    pub startup_id: DbId,
}

/// Request body for an advisor requesting the contact reveal.
#[derive(Debug, Deserialize)]
pub struct RevealContactRequest {
    pub advisor_id: DbId,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// Contact details for one party, exposed only after the reveal.
#[derive(Debug, Serialize)]
pub struct PartyContact {
    pub name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
}

impl From<Investor> for PartyContact {
    fn from(investor: Investor) -> Self {
        Self {
            name: investor.name,
            contact_email: investor.contact_email,
            contact_phone: investor.contact_phone,
        }
    }
}

impl From<Startup> for PartyContact {
    fn from(startup: Startup) -> Self {
        Self {
            name: startup.name,
            contact_email: startup.contact_email,
            contact_phone: startup.contact_phone,
        }
    }
}

/// Contact blocks for both sides of an offer.
#[derive(Debug, Serialize)]
pub struct ContactBlock {
    pub investor: PartyContact,
    pub startup: PartyContact,
}

/// An offer with its contact block; `contact` is `null` until both
/// advisor gates have cleared.
#[derive(Debug, Serialize)]
pub struct OfferDetail {
    #[serde(flatten)]
    pub offer: Offer,
    pub contact: Option<ContactBlock>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/offers
///
/// Submit an investment offer. The advisor gates are fixed from the two
/// parties' advisor relationships at this moment; the offer starts at
/// whichever stage those gates allow.
pub async fn create_offer(
    State(state): State<AppState>,
    Json(input): Json<CreateOffer>,
) -> AppResult<impl IntoResponse> {
    let offer = state.offers.create(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: offer })))
}

/// GET /api/v1/offers/{id}
///
/// Fetch an offer. Contact details for both parties are attached only once
/// the offer's contact reveal has happened.
pub async fn get_offer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let offer = OfferRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "offer",
            id,
        })?;

    let contact = if offer.contact_revealed {
        Some(load_contact_block(&state, &offer).await?)
    } else {
        None
    };

    Ok(Json(DataResponse {
        data: OfferDetail { offer, contact },
    }))
}

/// GET /api/v1/offers/{id}/events
///
/// List the offer's audit trail, oldest first.
pub async fn list_offer_events(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    OfferRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "offer",
            id,
        })?;

    let events = DomainEventRepo::list_for_entity(&state.pool, "offer", id).await?;
    Ok(Json(DataResponse { data: events }))
}

/// POST /api/v1/offers/{id}/decide
///
/// Record an advisor's approve/reject decision on their side's gate.
pub async fn decide_offer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<DecideOfferRequest>,
) -> AppResult<impl IntoResponse> {
    let offer = state
        .offers
        .decide(id, input.role, input.advisor_id, input.decision)
        .await?;
    Ok(Json(DataResponse { data: offer }))
}

/// POST /api/v1/offers/{id}/accept
///
/// The receiving startup accepts the offer at the final approval stage.
pub async fn accept_offer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AcceptOfferRequest>,
) -> AppResult<impl IntoResponse> {
    let offer = state.offers.accept(id, input.startup_id).await?;
    Ok(Json(DataResponse { data: offer }))
}

/// POST /api/v1/offers/{id}/fast-forward
///
/// Either party jumps a non-terminal offer straight to acceptance, leaving
/// undecided gates untouched.
pub async fn fast_forward_offer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(actor): Json<OfferParty>,
) -> AppResult<impl IntoResponse> {
    let offer = state.offers.fast_forward(id, actor).await?;
    Ok(Json(DataResponse { data: offer }))
}

/// POST /api/v1/offers/{id}/reveal-contact
///
/// An advisor on the offer unlocks the contact block once both gates are
/// clear. Repeat calls succeed without changing anything.
pub async fn reveal_offer_contact(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RevealContactRequest>,
) -> AppResult<impl IntoResponse> {
    let offer = state.offers.reveal_contact(id, input.advisor_id).await?;

    let contact = load_contact_block(&state, &offer).await?;
    Ok(Json(DataResponse {
        data: OfferDetail {
            offer,
            contact: Some(contact),
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load both parties' contact details for a revealed offer.
async fn load_contact_block(state: &AppState, offer: &Offer) -> AppResult<ContactBlock> {
    let investor = InvestorRepo::find_by_id(&state.pool, offer.investor_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "investor",
            id: offer.investor_id,
        })?;
    let startup = StartupRepo::find_by_id(&state.pool, offer.startup_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "startup",
            id: offer.startup_id,
        })?;

    Ok(ContactBlock {
        investor: investor.into(),
        startup: startup.into(),
    })
}
