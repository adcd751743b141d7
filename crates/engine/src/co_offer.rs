//! Co-investment offer engine (PRD-15).
//!
//! Drives the linear participation-request chain. The startup's accept is
//! the only step that touches two rows: it locks the opportunity after the
//! offer (always in that order) and runs the capacity check against the
//! committed accepted total inside the same transaction, so concurrent
//! accepts cannot jointly overdraw the listing.

use std::sync::Arc;

use dealflow_core::co_offer::{self, CoOfferRole, CoOfferStatus};
use dealflow_core::error::CoreError;
use dealflow_core::gate::{ApprovalStatus, Decision};
use dealflow_core::opportunity;
use dealflow_core::types::DbId;
use dealflow_db::models::co_offer::{CoInvestmentOffer, CreateCoInvestmentOffer};
use dealflow_db::models::opportunity::CoInvestmentOpportunity;
use dealflow_db::repositories::{AdvisorRepo, CoOfferRepo, InvestorRepo, OpportunityRepo};
use dealflow_db::DbPool;
use dealflow_events::{DomainEvent, EventBus};
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// Entity type tag used in domain events.
const ENTITY_CO_OFFER: &str = "co_investment_offer";

// ---------------------------------------------------------------------------
// Actors
// ---------------------------------------------------------------------------

/// The three actors that decide a co-investment offer, each carrying the
/// identity the engine verifies against the stored relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum CoOfferActor {
    InvestorAdvisor { advisor_id: DbId },
    LeadInvestor { investor_id: DbId },
    Startup { startup_id: DbId },
}

impl CoOfferActor {
    fn role(self) -> CoOfferRole {
        match self {
            Self::InvestorAdvisor { .. } => CoOfferRole::InvestorAdvisor,
            Self::LeadInvestor { .. } => CoOfferRole::LeadInvestor,
            Self::Startup { .. } => CoOfferRole::Startup,
        }
    }

    /// Actor tag recorded in domain events.
    fn actor_label(self) -> String {
        match self {
            Self::InvestorAdvisor { advisor_id } => format!("investor_advisor:{advisor_id}"),
            Self::LeadInvestor { investor_id } => format!("lead_investor:{investor_id}"),
            Self::Startup { startup_id } => format!("startup:{startup_id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Orchestrates co-investment offer transitions.
pub struct CoOfferEngine {
    pool: DbPool,
    event_bus: Arc<EventBus>,
}

impl CoOfferEngine {
    pub fn new(pool: DbPool, event_bus: Arc<EventBus>) -> Self {
        Self { pool, event_bus }
    }

    /// An investor asks to join an opportunity.
    ///
    /// Legal only against a fully-approved, active opportunity; the amount
    /// must sit within the listing's per-offer bounds. Capacity is not
    /// pre-checked here: the authoritative check runs in the accepting
    /// transaction.
    pub async fn create(
        &self,
        input: &CreateCoInvestmentOffer,
    ) -> EngineResult<CoInvestmentOffer> {
        let opportunity = OpportunityRepo::find_by_id(&self.pool, input.opportunity_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "co_investment_opportunity",
                id: input.opportunity_id,
            })?;
        if !opportunity.state().is_open_for_offers() {
            return Err(CoreError::InvalidState(format!(
                "opportunity {} is {} and not open for co-investment",
                opportunity.id,
                opportunity.state().label()
            ))
            .into());
        }

        InvestorRepo::find_by_id(&self.pool, input.investor_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "investor",
                id: input.investor_id,
            })?;

        co_offer::validate_amount(
            input.amount,
            opportunity.minimum_co_investment,
            opportunity.maximum_co_investment,
        )?;

        let advisor = AdvisorRepo::resolve_for_investor(&self.pool, input.investor_id).await?;
        let status = CoOfferStatus::initial(advisor.is_some());
        let advisor_status = advisor.map(|_| ApprovalStatus::Pending);

        let offer = CoOfferRepo::create(&self.pool, input, status, advisor_status).await?;

        tracing::info!(
            co_offer_id = offer.id,
            opportunity_id = offer.opportunity_id,
            investor_id = offer.investor_id,
            status = %offer.status,
            "Co-investment offer created"
        );

        self.event_bus.publish(DomainEvent::new(
            "co_investment_offer.created",
            ENTITY_CO_OFFER,
            offer.id,
            "none",
            status.as_str(),
            format!("investor:{}", offer.investor_id),
        ));

        Ok(offer)
    }

    /// Apply a decision at the offer's current chain step.
    ///
    /// A terminal offer fails `InvalidState` before any identity check.
    /// The advisor step records its decision alongside the chain move so
    /// the skipped-step rule stays visible in the row.
    pub async fn decide(
        &self,
        co_offer_id: DbId,
        actor: CoOfferActor,
        decision: Decision,
    ) -> EngineResult<CoInvestmentOffer> {
        let role = actor.role();
        let mut tx = self.pool.begin().await?;

        let offer = CoOfferRepo::lock_by_id(&mut tx, co_offer_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "co_investment_offer",
                id: co_offer_id,
            })?;
        let previous = offer.status;
        let next = previous.decide(role, decision)?;

        let opportunity = OpportunityRepo::find_by_id(&self.pool, offer.opportunity_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "co_investment_opportunity",
                id: offer.opportunity_id,
            })?;
        self.authorize(&offer, &opportunity, actor).await?;

        if next == CoOfferStatus::Accepted {
            // Lock order: offer first, then opportunity. The capacity
            // check and the accepting write must see the same committed
            // accepted total.
            let opportunity = OpportunityRepo::lock_by_id(&mut tx, offer.opportunity_id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "co_investment_opportunity",
                    id: offer.opportunity_id,
                })?;
            if !opportunity.state().is_open_for_offers() {
                return Err(CoreError::InvalidState(format!(
                    "opportunity {} is {} and no longer accepting offers",
                    opportunity.id,
                    opportunity.state().label()
                ))
                .into());
            }
            let accepted_total =
                CoOfferRepo::accepted_total_for_opportunity(&mut tx, offer.opportunity_id)
                    .await?;
            opportunity::check_capacity(
                opportunity.maximum_co_investment,
                accepted_total,
                offer.amount,
            )?;
        }

        let updated = match role {
            CoOfferRole::InvestorAdvisor => {
                CoOfferRepo::record_advisor_decision(
                    &mut tx,
                    co_offer_id,
                    next,
                    ApprovalStatus::from(decision),
                )
                .await?
            }
            CoOfferRole::LeadInvestor | CoOfferRole::Startup => {
                CoOfferRepo::update_status(&mut tx, co_offer_id, next).await?
            }
        };
        tx.commit().await?;

        tracing::info!(
            co_offer_id,
            actor = %actor.actor_label(),
            decision = %decision,
            status = %updated.status,
            "Co-investment offer decided"
        );

        self.event_bus.publish(
            DomainEvent::new(
                "co_investment_offer.decided",
                ENTITY_CO_OFFER,
                co_offer_id,
                previous.as_str(),
                next.as_str(),
                actor.actor_label(),
            )
            .with_payload(serde_json::json!({
                "role": role,
                "decision": decision,
            })),
        );

        Ok(updated)
    }

    /// Verify the acting identity owns the step being decided.
    async fn authorize(
        &self,
        offer: &CoInvestmentOffer,
        opportunity: &CoInvestmentOpportunity,
        actor: CoOfferActor,
    ) -> EngineResult<()> {
        match actor {
            CoOfferActor::InvestorAdvisor { advisor_id } => {
                let resolved =
                    AdvisorRepo::resolve_for_investor(&self.pool, offer.investor_id).await?;
                match resolved {
                    Some(advisor) if advisor.id == advisor_id => Ok(()),
                    _ => Err(CoreError::NotAuthorized(format!(
                        "advisor {advisor_id} is not the participating investor's advisor"
                    ))
                    .into()),
                }
            }
            CoOfferActor::LeadInvestor { investor_id } => {
                if opportunity.lead_investor_id == investor_id {
                    Ok(())
                } else {
                    Err(CoreError::NotAuthorized(format!(
                        "investor {investor_id} is not the lead investor of opportunity {}",
                        opportunity.id
                    ))
                    .into())
                }
            }
            CoOfferActor::Startup { startup_id } => {
                if opportunity.startup_id == startup_id {
                    Ok(())
                } else {
                    Err(CoreError::NotAuthorized(format!(
                        "startup {startup_id} is not the startup of opportunity {}",
                        opportunity.id
                    ))
                    .into())
                }
            }
        }
    }
}
