//! Co-investment opportunity engine (PRD-15).
//!
//! Drives listing approval (two sequential advisor gates plus the
//! startup's own stage-independent decision), the explicit lead-investor
//! close, and the derived capacity read.

use std::sync::Arc;

use dealflow_core::error::CoreError;
use dealflow_core::gate::Decision;
use dealflow_core::opportunity::{self, OpportunityRole, OpportunityState};
use dealflow_core::types::DbId;
use dealflow_db::models::opportunity::{
    CapacitySummary, CoInvestmentOpportunity, CreateCoInvestmentOpportunity,
};
use dealflow_db::repositories::{
    AdvisorRepo, CoOfferRepo, InvestorRepo, OpportunityRepo, StartupRepo,
};
use dealflow_db::DbPool;
use dealflow_events::{DomainEvent, EventBus};
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// Entity type tag used in domain events.
const ENTITY_OPPORTUNITY: &str = "co_investment_opportunity";

// ---------------------------------------------------------------------------
// Actors
// ---------------------------------------------------------------------------

/// The three actors that decide an opportunity listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum OpportunityActor {
    LeadInvestorAdvisor { advisor_id: DbId },
    StartupAdvisor { advisor_id: DbId },
    Startup { startup_id: DbId },
}

impl OpportunityActor {
    fn role(self) -> OpportunityRole {
        match self {
            Self::LeadInvestorAdvisor { .. } => OpportunityRole::LeadInvestorAdvisor,
            Self::StartupAdvisor { .. } => OpportunityRole::StartupAdvisor,
            Self::Startup { .. } => OpportunityRole::Startup,
        }
    }

    /// Actor tag recorded in domain events.
    fn actor_label(self) -> String {
        match self {
            Self::LeadInvestorAdvisor { advisor_id } => {
                format!("lead_investor_advisor:{advisor_id}")
            }
            Self::StartupAdvisor { advisor_id } => format!("startup_advisor:{advisor_id}"),
            Self::Startup { startup_id } => format!("startup:{startup_id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Orchestrates opportunity-listing transitions and capacity reads.
pub struct OpportunityEngine {
    pool: DbPool,
    event_bus: Arc<EventBus>,
}

impl OpportunityEngine {
    pub fn new(pool: DbPool, event_bus: Arc<EventBus>) -> Self {
        Self { pool, event_bus }
    }

    /// List a new opportunity.
    ///
    /// Capacity terms are validated structurally (`InvalidTerms`), both
    /// advisor relationships are resolved to fix the gate set, and the
    /// stage is evaluated immediately. `startup_status` always starts
    /// pending, so a fresh listing never opens at stage 4.
    pub async fn create(
        &self,
        input: &CreateCoInvestmentOpportunity,
    ) -> EngineResult<CoInvestmentOpportunity> {
        StartupRepo::find_by_id(&self.pool, input.startup_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "startup",
                id: input.startup_id,
            })?;
        InvestorRepo::find_by_id(&self.pool, input.lead_investor_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "investor",
                id: input.lead_investor_id,
            })?;

        opportunity::validate_terms(
            input.investment_amount,
            input.minimum_co_investment,
            input.maximum_co_investment,
        )?;

        let lead_advisor =
            AdvisorRepo::resolve_for_investor(&self.pool, input.lead_investor_id).await?;
        let startup_advisor =
            AdvisorRepo::resolve_for_startup(&self.pool, input.startup_id).await?;

        let state = OpportunityState::initial(lead_advisor.is_some(), startup_advisor.is_some());
        let listing = OpportunityRepo::create(&self.pool, input, &state).await?;

        tracing::info!(
            opportunity_id = listing.id,
            startup_id = listing.startup_id,
            lead_investor_id = listing.lead_investor_id,
            stage = listing.stage,
            "Co-investment opportunity created"
        );

        self.event_bus.publish(
            DomainEvent::new(
                "co_investment_opportunity.created",
                ENTITY_OPPORTUNITY,
                listing.id,
                "none",
                state.label(),
                format!("lead_investor:{}", listing.lead_investor_id),
            )
            .with_payload(serde_json::json!({
                "lead_advisor_status": state.lead_advisor_gate,
                "startup_advisor_status": state.startup_advisor_gate,
            })),
        );

        Ok(listing)
    }

    /// Apply a decision to the listing's sequential approval chain.
    pub async fn decide(
        &self,
        opportunity_id: DbId,
        actor: OpportunityActor,
        decision: Decision,
    ) -> EngineResult<CoInvestmentOpportunity> {
        let role = actor.role();
        let mut tx = self.pool.begin().await?;

        let listing = OpportunityRepo::lock_by_id(&mut tx, opportunity_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "co_investment_opportunity",
                id: opportunity_id,
            })?;
        let previous = listing.state();
        let next = previous.decide(role, decision)?;

        self.authorize(&listing, actor).await?;

        let updated = OpportunityRepo::update_state(&mut tx, opportunity_id, &next).await?;
        tx.commit().await?;

        tracing::info!(
            opportunity_id,
            actor = %actor.actor_label(),
            decision = %decision,
            stage = updated.stage,
            status = %updated.status,
            "Co-investment opportunity decided"
        );

        self.event_bus.publish(
            DomainEvent::new(
                "co_investment_opportunity.decided",
                ENTITY_OPPORTUNITY,
                opportunity_id,
                previous.label(),
                next.label(),
                actor.actor_label(),
            )
            .with_payload(serde_json::json!({
                "role": role,
                "decision": decision,
            })),
        );

        Ok(updated)
    }

    /// The lead investor withdraws an active listing.
    ///
    /// New co-investment offers and accepts against a closed listing fail
    /// `InvalidState`; already-accepted offers are untouched.
    pub async fn close(
        &self,
        opportunity_id: DbId,
        investor_id: DbId,
    ) -> EngineResult<CoInvestmentOpportunity> {
        let mut tx = self.pool.begin().await?;

        let listing = OpportunityRepo::lock_by_id(&mut tx, opportunity_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "co_investment_opportunity",
                id: opportunity_id,
            })?;
        let previous = listing.state();
        let next = previous.close()?;

        if listing.lead_investor_id != investor_id {
            return Err(CoreError::NotAuthorized(format!(
                "investor {investor_id} is not the lead investor of opportunity {opportunity_id}"
            ))
            .into());
        }

        let updated = OpportunityRepo::update_state(&mut tx, opportunity_id, &next).await?;
        tx.commit().await?;

        tracing::info!(opportunity_id, investor_id, "Co-investment opportunity closed");

        self.event_bus.publish(DomainEvent::new(
            "co_investment_opportunity.closed",
            ENTITY_OPPORTUNITY,
            opportunity_id,
            previous.label(),
            next.label(),
            format!("lead_investor:{investor_id}"),
        ));

        Ok(updated)
    }

    /// Capacity summary for a listing, from the committed accepted total.
    ///
    /// A plain read: it may lag a concurrent accept but never observes a
    /// partial write.
    pub async fn capacity(&self, opportunity_id: DbId) -> EngineResult<CapacitySummary> {
        let listing = OpportunityRepo::find_by_id(&self.pool, opportunity_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "co_investment_opportunity",
                id: opportunity_id,
            })?;
        let mut conn = self.pool.acquire().await?;
        let accepted_total =
            CoOfferRepo::accepted_total_for_opportunity(&mut conn, opportunity_id).await?;
        Ok(listing.capacity(accepted_total))
    }

    /// Verify the acting identity owns the gate being decided.
    async fn authorize(
        &self,
        listing: &CoInvestmentOpportunity,
        actor: OpportunityActor,
    ) -> EngineResult<()> {
        match actor {
            OpportunityActor::LeadInvestorAdvisor { advisor_id } => {
                let resolved =
                    AdvisorRepo::resolve_for_investor(&self.pool, listing.lead_investor_id)
                        .await?;
                match resolved {
                    Some(advisor) if advisor.id == advisor_id => Ok(()),
                    _ => Err(CoreError::NotAuthorized(format!(
                        "advisor {advisor_id} is not the lead investor's advisor"
                    ))
                    .into()),
                }
            }
            OpportunityActor::StartupAdvisor { advisor_id } => {
                let resolved =
                    AdvisorRepo::resolve_for_startup(&self.pool, listing.startup_id).await?;
                match resolved {
                    Some(advisor) if advisor.id == advisor_id => Ok(()),
                    _ => Err(CoreError::NotAuthorized(format!(
                        "advisor {advisor_id} is not the startup's advisor"
                    ))
                    .into()),
                }
            }
            OpportunityActor::Startup { startup_id } => {
                if listing.startup_id == startup_id {
                    Ok(())
                } else {
                    Err(CoreError::NotAuthorized(format!(
                        "startup {startup_id} is not the startup of opportunity {}",
                        listing.id
                    ))
                    .into())
                }
            }
        }
    }
}
