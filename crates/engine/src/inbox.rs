//! Advisor inbox aggregator (PRD-07).
//!
//! One read composing everything awaiting or previously handled by an
//! advisor across the three entity kinds. Pure reads on the pool, no
//! transactions: the view may lag a concurrent commit but never shows a
//! state that never existed. Entities whose party/advisor link no longer
//! resolves are omitted by the underlying joins, never an error.

use dealflow_core::co_offer::CoOfferStatus;
use dealflow_core::error::CoreError;
use dealflow_core::gate::GateStatus;
use dealflow_core::offer::OfferRole;
use dealflow_core::types::DbId;
use dealflow_db::models::co_offer::CoInvestmentOffer;
use dealflow_db::models::offer::Offer;
use dealflow_db::models::opportunity::CoInvestmentOpportunity;
use dealflow_db::repositories::{AdvisorRepo, CoOfferRepo, OfferRepo, OpportunityRepo};
use dealflow_db::DbPool;
use serde::Serialize;

use crate::error::EngineResult;

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// Offers on one side of an advisor's inbox: `pending` is what the
/// advisor can act on now; `resolved` is the audit trail (gates they
/// decided, plus offers that went terminal around a still-pending gate,
/// e.g. via fast-forward).
#[derive(Debug, Serialize)]
pub struct OfferSection {
    pub role: OfferRole,
    pub pending: Vec<Offer>,
    pub resolved: Vec<Offer>,
}

/// Co-investment offers where the advisor owns the first chain step.
#[derive(Debug, Serialize)]
pub struct CoOfferSection {
    pub pending: Vec<CoInvestmentOffer>,
    pub resolved: Vec<CoInvestmentOffer>,
}

/// Everything one advisor can currently act on, plus their history.
#[derive(Debug, Serialize)]
pub struct AdvisorInboxView {
    pub advisor_id: DbId,
    pub investor_side_offers: OfferSection,
    pub startup_side_offers: OfferSection,
    pub co_investment_offers: CoOfferSection,
    /// Listings awaiting this advisor as the lead investor's advisor.
    pub lead_advisor_opportunities: Vec<CoInvestmentOpportunity>,
    /// Listings awaiting this advisor as the startup's advisor.
    pub startup_advisor_opportunities: Vec<CoInvestmentOpportunity>,
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Builds the advisor-facing read model.
pub struct AdvisorInbox {
    pool: DbPool,
}

impl AdvisorInbox {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Build the full inbox for one advisor.
    ///
    /// Fails `NotFound` only when the advisor itself does not exist.
    pub async fn for_advisor(&self, advisor_id: DbId) -> EngineResult<AdvisorInboxView> {
        AdvisorRepo::find_by_id(&self.pool, advisor_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "advisor",
                id: advisor_id,
            })?;

        let investor_side =
            OfferRepo::list_for_investor_side_advisor(&self.pool, advisor_id).await?;
        let startup_side = OfferRepo::list_for_startup_side_advisor(&self.pool, advisor_id).await?;
        let co_offers = CoOfferRepo::list_for_participant_advisor(&self.pool, advisor_id).await?;
        let lead_listings =
            OpportunityRepo::list_awaiting_lead_advisor(&self.pool, advisor_id).await?;
        let startup_listings =
            OpportunityRepo::list_awaiting_startup_advisor(&self.pool, advisor_id).await?;

        Ok(AdvisorInboxView {
            advisor_id,
            investor_side_offers: split_offers(OfferRole::InvestorAdvisor, investor_side),
            startup_side_offers: split_offers(OfferRole::StartupAdvisor, startup_side),
            co_investment_offers: split_co_offers(co_offers),
            lead_advisor_opportunities: lead_listings,
            startup_advisor_opportunities: startup_listings,
        })
    }
}

/// An offer is actionable while the side's gate is pending and the offer
/// itself still accepts decisions.
fn split_offers(role: OfferRole, offers: Vec<Offer>) -> OfferSection {
    let (pending, resolved): (Vec<Offer>, Vec<Offer>) = offers.into_iter().partition(|offer| {
        let state = offer.state();
        state.gate(role) == GateStatus::Pending && !state.is_terminal()
    });
    OfferSection {
        role,
        pending,
        resolved,
    }
}

/// A co-investment offer is actionable only at the advisor step itself.
fn split_co_offers(offers: Vec<CoInvestmentOffer>) -> CoOfferSection {
    let (pending, resolved): (Vec<CoInvestmentOffer>, Vec<CoInvestmentOffer>) = offers
        .into_iter()
        .partition(|offer| offer.status == CoOfferStatus::PendingInvestorAdvisorApproval);
    CoOfferSection { pending, resolved }
}
