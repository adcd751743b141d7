//! Regular investment offer state machine (PRD-12).
//!
//! An offer moves through four ordered stages, gated by up to two advisor
//! approvals that are independent of each other (either advisor may decide
//! first). The coarse `status` field is a projection of stage and gates,
//! recomputed on every transition and never set directly. Stage never
//! decreases; a reject freezes it at its current value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::gate::{Decision, GateStatus};

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Awaiting the investor-side advisor.
pub const STAGE_INVESTOR_ADVISOR_REVIEW: i16 = 1;
/// Awaiting the startup-side advisor.
pub const STAGE_STARTUP_ADVISOR_REVIEW: i16 = 2;
/// Both gates clear; awaiting the startup's own accept.
pub const STAGE_READY_FOR_STARTUP: i16 = 3;
/// Accepted and active.
pub const STAGE_ACTIVE: i16 = 4;

// ---------------------------------------------------------------------------
// Roles and statuses
// ---------------------------------------------------------------------------

/// The two advisor roles that hold gates on a regular offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferRole {
    InvestorAdvisor,
    StartupAdvisor,
}

impl OfferRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvestorAdvisor => "investor_advisor",
            Self::StartupAdvisor => "startup_advisor",
        }
    }
}

impl fmt::Display for OfferRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse offer lifecycle tag, always derived from stage and gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
}

impl OfferStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// The transition-relevant state of a regular offer.
///
/// Transition methods are pure: they take the current state by reference and
/// return the next state (or a [`CoreError`]), leaving persistence and
/// atomicity to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferState {
    pub stage: i16,
    pub status: OfferStatus,
    pub investor_gate: GateStatus,
    pub startup_gate: GateStatus,
    pub contact_revealed: bool,
}

impl OfferState {
    /// State of a freshly created offer.
    ///
    /// Gates are fixed here from the advisor relationships resolved at
    /// creation time, then the stage is evaluated immediately: an offer
    /// whose investor has no advisor skips straight past stage 1, and one
    /// with no advisors at all lands at stage 3 with contact revealed.
    pub fn initial(investor_has_advisor: bool, startup_has_advisor: bool) -> Self {
        let mut state = Self {
            stage: STAGE_INVESTOR_ADVISOR_REVIEW,
            status: OfferStatus::Pending,
            investor_gate: GateStatus::for_party(investor_has_advisor),
            startup_gate: GateStatus::for_party(startup_has_advisor),
            contact_revealed: false,
        };
        state.advance();
        state
    }

    /// Stage 4 offers and rejected offers accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        self.stage == STAGE_ACTIVE || self.status == OfferStatus::Rejected
    }

    /// Both gates are clear (approved or not required).
    pub fn gates_clear(&self) -> bool {
        self.investor_gate.is_clear() && self.startup_gate.is_clear()
    }

    /// Gate held by the given role.
    pub fn gate(&self, role: OfferRole) -> GateStatus {
        match role {
            OfferRole::InvestorAdvisor => self.investor_gate,
            OfferRole::StartupAdvisor => self.startup_gate,
        }
    }

    /// Re-evaluate stage advancement to a fixpoint and recompute the
    /// derived fields.
    ///
    /// Advancement is ordered (1→2 needs the investor gate, 2→3 also needs
    /// the startup gate) but decisions are not: a startup-advisor approval
    /// recorded while the offer still sits at stage 1 takes effect the
    /// moment the investor gate clears.
    fn advance(&mut self) {
        if self.stage == STAGE_INVESTOR_ADVISOR_REVIEW && self.investor_gate.is_clear() {
            self.stage = STAGE_STARTUP_ADVISOR_REVIEW;
        }
        if self.stage == STAGE_STARTUP_ADVISOR_REVIEW && self.startup_gate.is_clear() {
            self.stage = STAGE_READY_FOR_STARTUP;
        }
        if self.gates_clear() {
            self.contact_revealed = true;
        }
        self.status = self.derived_status();
    }

    /// `status` as a pure function of gates and stage: any rejected gate
    /// makes the offer rejected, stage 4 makes it accepted, anything else
    /// is pending.
    fn derived_status(&self) -> OfferStatus {
        if self.investor_gate == GateStatus::Rejected || self.startup_gate == GateStatus::Rejected {
            OfferStatus::Rejected
        } else if self.stage == STAGE_ACTIVE {
            OfferStatus::Accepted
        } else {
            OfferStatus::Pending
        }
    }

    /// Apply an advisor's decision to their gate.
    ///
    /// Fails `InvalidState` on a terminal offer (never a silent no-op) and
    /// `NotAuthorized` when the role's gate is anything but `pending`,
    /// which covers already-decided gates and `not_required` gates alike.
    pub fn decide(&self, role: OfferRole, decision: Decision) -> Result<Self, CoreError> {
        if self.is_terminal() {
            return Err(CoreError::InvalidState(format!(
                "offer is {} and accepts no further decisions",
                self.label()
            )));
        }
        let gate = self.gate(role);
        if !gate.is_pending() {
            return Err(CoreError::NotAuthorized(format!(
                "{role} gate is {gate}, not pending"
            )));
        }

        let mut next = self.clone();
        let slot = match role {
            OfferRole::InvestorAdvisor => &mut next.investor_gate,
            OfferRole::StartupAdvisor => &mut next.startup_gate,
        };
        match decision {
            Decision::Approve => {
                *slot = GateStatus::Approved;
                next.advance();
            }
            Decision::Reject => {
                // Stage freezes where it is; only the projection changes.
                *slot = GateStatus::Rejected;
                next.status = next.derived_status();
            }
        }
        Ok(next)
    }

    /// The startup accepts the offer, legal only at stage 3.
    pub fn startup_accepts(&self) -> Result<Self, CoreError> {
        if self.status == OfferStatus::Rejected || self.stage != STAGE_READY_FOR_STARTUP {
            return Err(CoreError::InvalidState(format!(
                "startup can only accept an offer at stage {STAGE_READY_FOR_STARTUP}, offer is {}",
                self.label()
            )));
        }
        let mut next = self.clone();
        next.stage = STAGE_ACTIVE;
        next.contact_revealed = true;
        next.status = next.derived_status();
        Ok(next)
    }

    /// Manual override ("negotiate"): jump straight to stage 4 and reveal
    /// contact details.
    ///
    /// Gates are left exactly as they were, pending ones included; the
    /// override never fabricates approvals. Callers are expected to record
    /// the bypassed gate statuses alongside the transition.
    pub fn fast_forward(&self) -> Result<Self, CoreError> {
        if self.is_terminal() {
            return Err(CoreError::InvalidState(format!(
                "cannot fast-forward an offer that is {}",
                self.label()
            )));
        }
        let mut next = self.clone();
        next.stage = STAGE_ACTIVE;
        next.contact_revealed = true;
        next.status = next.derived_status();
        Ok(next)
    }

    /// Reveal contact details, idempotently.
    ///
    /// A second call on an already-revealed offer succeeds without change.
    /// A first call requires both gates clear.
    pub fn reveal_contact(&self) -> Result<Self, CoreError> {
        if self.contact_revealed {
            return Ok(self.clone());
        }
        if !self.gates_clear() {
            return Err(CoreError::InvalidState(
                "contact details stay hidden until both advisor gates are clear".to_string(),
            ));
        }
        let mut next = self.clone();
        next.contact_revealed = true;
        Ok(next)
    }

    /// Human-readable state label used in domain events and error messages.
    pub fn label(&self) -> String {
        match self.status {
            OfferStatus::Rejected => "rejected".to_string(),
            OfferStatus::Accepted => "accepted".to_string(),
            OfferStatus::Pending => format!("stage_{}", self.stage),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
