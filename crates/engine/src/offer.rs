//! Offer stage engine (PRD-12).
//!
//! Drives the regular-offer state machine against the store: every
//! mutating operation locks the offer row, computes the next state via
//! [`OfferState`], verifies the actor against the currently-resolved
//! advisor relationships, persists the result, and publishes a domain
//! event. Held in the API state as an `Arc<OfferEngine>`.

use std::sync::Arc;

use dealflow_core::error::CoreError;
use dealflow_core::gate::Decision;
use dealflow_core::offer::{OfferRole, OfferState};
use dealflow_core::types::DbId;
use dealflow_db::models::offer::{CreateOffer, Offer};
use dealflow_db::repositories::{AdvisorRepo, InvestorRepo, OfferRepo, StartupRepo};
use dealflow_db::DbPool;
use dealflow_events::{DomainEvent, EventBus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// Entity type tag used in domain events.
const ENTITY_OFFER: &str = "offer";

// ---------------------------------------------------------------------------
// Actors
// ---------------------------------------------------------------------------

/// One of the two parties to an offer; the only actors allowed to
/// fast-forward it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum OfferParty {
    Investor { investor_id: DbId },
    Startup { startup_id: DbId },
}

impl OfferParty {
    /// Actor tag recorded in domain events.
    fn actor_label(self) -> String {
        match self {
            Self::Investor { investor_id } => format!("investor:{investor_id}"),
            Self::Startup { startup_id } => format!("startup:{startup_id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Term validation
// ---------------------------------------------------------------------------

/// Structural validation of offer terms, before anything is persisted.
fn validate_terms(input: &CreateOffer) -> Result<(), CoreError> {
    if input.amount <= Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "offer amount must be positive, got {}",
            input.amount
        )));
    }
    if input.equity_percent <= Decimal::ZERO || input.equity_percent > Decimal::ONE_HUNDRED {
        return Err(CoreError::Validation(format!(
            "equity_percent must be in (0, 100], got {}",
            input.equity_percent
        )));
    }
    if input.currency.trim().is_empty() {
        return Err(CoreError::Validation(
            "currency must not be empty".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Orchestrates regular-offer transitions.
pub struct OfferEngine {
    pool: DbPool,
    event_bus: Arc<EventBus>,
}

impl OfferEngine {
    pub fn new(pool: DbPool, event_bus: Arc<EventBus>) -> Self {
        Self { pool, event_bus }
    }

    /// Create an offer, resolving both advisor relationships to fix the
    /// gate set.
    ///
    /// The initial stage is evaluated immediately: an offer whose parties
    /// have no effective advisors lands at stage 3 with contact already
    /// revealed.
    pub async fn create(&self, input: &CreateOffer) -> EngineResult<Offer> {
        validate_terms(input)?;

        InvestorRepo::find_by_id(&self.pool, input.investor_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "investor",
                id: input.investor_id,
            })?;
        StartupRepo::find_by_id(&self.pool, input.startup_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "startup",
                id: input.startup_id,
            })?;

        let investor_advisor =
            AdvisorRepo::resolve_for_investor(&self.pool, input.investor_id).await?;
        let startup_advisor =
            AdvisorRepo::resolve_for_startup(&self.pool, input.startup_id).await?;

        let state = OfferState::initial(investor_advisor.is_some(), startup_advisor.is_some());
        let offer = OfferRepo::create(&self.pool, input, &state).await?;

        tracing::info!(
            offer_id = offer.id,
            investor_id = offer.investor_id,
            startup_id = offer.startup_id,
            stage = offer.stage,
            "Offer created"
        );

        self.event_bus.publish(
            DomainEvent::new(
                "offer.created",
                ENTITY_OFFER,
                offer.id,
                "none",
                state.label(),
                format!("investor:{}", offer.investor_id),
            )
            .with_payload(serde_json::json!({
                "investor_advisor_status": state.investor_gate,
                "startup_advisor_status": state.startup_gate,
            })),
        );

        Ok(offer)
    }

    /// Apply an advisor's decision to their gate.
    ///
    /// Concurrent decisions on the same offer serialize on the row lock;
    /// the loser revalidates against the committed state. A terminal offer
    /// fails `InvalidState` before any identity check, so a double-submit
    /// surfaces as `InvalidState` rather than `NotAuthorized`.
    pub async fn decide(
        &self,
        offer_id: DbId,
        role: OfferRole,
        advisor_id: DbId,
        decision: Decision,
    ) -> EngineResult<Offer> {
        let mut tx = self.pool.begin().await?;

        let offer = OfferRepo::lock_by_id(&mut tx, offer_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "offer",
                id: offer_id,
            })?;
        let previous = offer.state();
        let next = previous.decide(role, decision)?;

        self.authorize_advisor(&offer, role, advisor_id).await?;

        let updated = OfferRepo::update_state(&mut tx, offer_id, &next).await?;
        tx.commit().await?;

        tracing::info!(
            offer_id,
            advisor_id,
            role = %role,
            decision = %decision,
            stage = updated.stage,
            status = %updated.status,
            "Offer gate decided"
        );

        self.event_bus.publish(
            DomainEvent::new(
                "offer.gate_decided",
                ENTITY_OFFER,
                offer_id,
                previous.label(),
                next.label(),
                format!("{role}:{advisor_id}"),
            )
            .with_payload(serde_json::json!({
                "role": role,
                "decision": decision,
            })),
        );

        Ok(updated)
    }

    /// The startup accepts the offer at stage 3, activating it.
    pub async fn accept(&self, offer_id: DbId, startup_id: DbId) -> EngineResult<Offer> {
        let mut tx = self.pool.begin().await?;

        let offer = OfferRepo::lock_by_id(&mut tx, offer_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "offer",
                id: offer_id,
            })?;
        let previous = offer.state();
        let next = previous.startup_accepts()?;

        if offer.startup_id != startup_id {
            return Err(CoreError::NotAuthorized(format!(
                "startup {startup_id} is not the recipient of offer {offer_id}"
            ))
            .into());
        }

        let updated = OfferRepo::update_state(&mut tx, offer_id, &next).await?;
        tx.commit().await?;

        tracing::info!(offer_id, startup_id, "Offer accepted by startup");

        self.event_bus.publish(DomainEvent::new(
            "offer.accepted",
            ENTITY_OFFER,
            offer_id,
            previous.label(),
            next.label(),
            format!("startup:{startup_id}"),
        ));

        Ok(updated)
    }

    /// Manual override ("negotiate"): jump to stage 4 and reveal contact,
    /// leaving gate statuses exactly as they were.
    ///
    /// Only the offer's own investor or startup may invoke it. The emitted
    /// event snapshots the bypassed gates and the override is logged at
    /// WARN.
    pub async fn fast_forward(&self, offer_id: DbId, actor: OfferParty) -> EngineResult<Offer> {
        let mut tx = self.pool.begin().await?;

        let offer = OfferRepo::lock_by_id(&mut tx, offer_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "offer",
                id: offer_id,
            })?;
        let previous = offer.state();
        let next = previous.fast_forward()?;

        match actor {
            OfferParty::Investor { investor_id } if offer.investor_id == investor_id => {}
            OfferParty::Startup { startup_id } if offer.startup_id == startup_id => {}
            _ => {
                return Err(CoreError::NotAuthorized(format!(
                    "only the parties to offer {offer_id} may fast-forward it"
                ))
                .into());
            }
        }

        let updated = OfferRepo::update_state(&mut tx, offer_id, &next).await?;
        tx.commit().await?;

        tracing::warn!(
            offer_id,
            actor = %actor.actor_label(),
            bypassed_investor_gate = %previous.investor_gate,
            bypassed_startup_gate = %previous.startup_gate,
            "Offer fast-forwarded past advisor review"
        );

        self.event_bus.publish(
            DomainEvent::new(
                "offer.fast_forwarded",
                ENTITY_OFFER,
                offer_id,
                previous.label(),
                next.label(),
                actor.actor_label(),
            )
            .with_payload(serde_json::json!({
                "bypassed_gates": {
                    "investor_advisor_status": previous.investor_gate,
                    "startup_advisor_status": previous.startup_gate,
                },
            })),
        );

        Ok(updated)
    }

    /// Manually reveal contact details, idempotently.
    ///
    /// Unlike `decide`, authorization runs before the state check: the
    /// idempotent success on an already-revealed offer is reserved for the
    /// offer's own advisors.
    pub async fn reveal_contact(&self, offer_id: DbId, advisor_id: DbId) -> EngineResult<Offer> {
        let mut tx = self.pool.begin().await?;

        let offer = OfferRepo::lock_by_id(&mut tx, offer_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "offer",
                id: offer_id,
            })?;

        let investor_advisor =
            AdvisorRepo::resolve_for_investor(&self.pool, offer.investor_id).await?;
        let startup_advisor =
            AdvisorRepo::resolve_for_startup(&self.pool, offer.startup_id).await?;
        let role = if investor_advisor.is_some_and(|a| a.id == advisor_id) {
            OfferRole::InvestorAdvisor
        } else if startup_advisor.is_some_and(|a| a.id == advisor_id) {
            OfferRole::StartupAdvisor
        } else {
            return Err(CoreError::NotAuthorized(format!(
                "advisor {advisor_id} does not advise either party to offer {offer_id}"
            ))
            .into());
        };

        let previous = offer.state();
        let next = previous.reveal_contact()?;
        if next == previous {
            // Already revealed; nothing to write or announce.
            tx.commit().await?;
            return Ok(offer);
        }

        let updated = OfferRepo::update_state(&mut tx, offer_id, &next).await?;
        tx.commit().await?;

        tracing::info!(offer_id, advisor_id, "Offer contact details revealed");

        self.event_bus.publish(
            DomainEvent::new(
                "offer.contact_revealed",
                ENTITY_OFFER,
                offer_id,
                previous.label(),
                next.label(),
                format!("{role}:{advisor_id}"),
            )
            .with_payload(serde_json::json!({ "contact_revealed": true })),
        );

        Ok(updated)
    }

    /// Check that `advisor_id` is the currently-resolved advisor for the
    /// given side of the offer.
    async fn authorize_advisor(
        &self,
        offer: &Offer,
        role: OfferRole,
        advisor_id: DbId,
    ) -> EngineResult<()> {
        let resolved = match role {
            OfferRole::InvestorAdvisor => {
                AdvisorRepo::resolve_for_investor(&self.pool, offer.investor_id).await?
            }
            OfferRole::StartupAdvisor => {
                AdvisorRepo::resolve_for_startup(&self.pool, offer.startup_id).await?
            }
        };
        match resolved {
            Some(advisor) if advisor.id == advisor_id => Ok(()),
            _ => Err(CoreError::NotAuthorized(format!(
                "advisor {advisor_id} is not the {role} for offer {}",
                offer.id
            ))
            .into()),
        }
    }
}
