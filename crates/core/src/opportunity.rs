//! Co-investment opportunity state machine and capacity math (PRD-15).
//!
//! A lead investor lists an opportunity against a startup, committing a
//! total amount and opening a slice of it to other investors. Approval runs
//! through two sequential advisor gates (the lead investor's advisor at
//! stage 1, the startup's advisor at stage 2) plus the startup's own
//! decision, which is tracked separately and may land at any point. There
//! is no stage 3: the machine jumps from 2 to 4 once the last requirement
//! clears.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::gate::{ApprovalStatus, Decision, GateStatus};

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Awaiting the lead investor's advisor.
pub const STAGE_LEAD_ADVISOR_REVIEW: i16 = 1;
/// Awaiting the startup's advisor.
pub const STAGE_STARTUP_ADVISOR_REVIEW: i16 = 2;
/// All gates clear and the startup approved; open for business.
pub const STAGE_FULLY_APPROVED: i16 = 4;

// ---------------------------------------------------------------------------
// Roles and statuses
// ---------------------------------------------------------------------------

/// The three roles that decide an opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityRole {
    LeadInvestorAdvisor,
    StartupAdvisor,
    Startup,
}

impl OpportunityRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeadInvestorAdvisor => "lead_investor_advisor",
            Self::StartupAdvisor => "startup_advisor",
            Self::Startup => "startup",
        }
    }
}

impl fmt::Display for OpportunityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of an opportunity listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OpportunityStatus {
    Active,
    Closed,
    Rejected,
}

impl OpportunityStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Closed => "closed",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for OpportunityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Transition-relevant state of a co-investment opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunityState {
    pub stage: i16,
    pub status: OpportunityStatus,
    pub lead_advisor_gate: GateStatus,
    pub startup_advisor_gate: GateStatus,
    /// The startup's own decision, required in addition to its advisor's
    /// gate and independent of the current stage.
    pub startup_approval: ApprovalStatus,
}

impl OpportunityState {
    /// State of a freshly created opportunity.
    ///
    /// `startup_approval` always starts pending, so a new opportunity can
    /// reach stage 2 immediately (no lead advisor) but never stage 4.
    pub fn initial(lead_has_advisor: bool, startup_has_advisor: bool) -> Self {
        let mut state = Self {
            stage: STAGE_LEAD_ADVISOR_REVIEW,
            status: OpportunityStatus::Active,
            lead_advisor_gate: GateStatus::for_party(lead_has_advisor),
            startup_advisor_gate: GateStatus::for_party(startup_has_advisor),
            startup_approval: ApprovalStatus::Pending,
        };
        state.advance();
        state
    }

    /// Closed and rejected opportunities accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        self.status != OpportunityStatus::Active
    }

    /// Fully approved and open to co-investment offers.
    pub fn is_open_for_offers(&self) -> bool {
        self.status == OpportunityStatus::Active && self.stage == STAGE_FULLY_APPROVED
    }

    fn advance(&mut self) {
        if self.stage == STAGE_LEAD_ADVISOR_REVIEW && self.lead_advisor_gate.is_clear() {
            self.stage = STAGE_STARTUP_ADVISOR_REVIEW;
        }
        if self.stage == STAGE_STARTUP_ADVISOR_REVIEW
            && self.startup_advisor_gate.is_clear()
            && self.startup_approval == ApprovalStatus::Approved
        {
            self.stage = STAGE_FULLY_APPROVED;
        }
    }

    /// Apply a role's decision.
    ///
    /// Advisor gates here are sequential, unlike regular offers: the
    /// startup advisor's gate only opens once the opportunity reaches
    /// stage 2. The startup's own decision is accepted at any non-terminal
    /// stage while still pending. Any reject makes the whole opportunity
    /// `rejected` with the stage frozen.
    pub fn decide(&self, role: OpportunityRole, decision: Decision) -> Result<Self, CoreError> {
        if self.is_terminal() {
            return Err(CoreError::InvalidState(format!(
                "opportunity is {} and accepts no further decisions",
                self.status
            )));
        }
        if self.stage == STAGE_FULLY_APPROVED {
            return Err(CoreError::InvalidState(
                "opportunity is already fully approved".to_string(),
            ));
        }

        let mut next = self.clone();
        match role {
            OpportunityRole::LeadInvestorAdvisor => {
                if self.stage != STAGE_LEAD_ADVISOR_REVIEW
                    || !self.lead_advisor_gate.is_pending()
                {
                    return Err(CoreError::NotAuthorized(format!(
                        "lead investor advisor gate is {} at stage {}",
                        self.lead_advisor_gate, self.stage
                    )));
                }
                next.lead_advisor_gate = GateStatus::from_decision(decision);
            }
            OpportunityRole::StartupAdvisor => {
                if self.stage != STAGE_STARTUP_ADVISOR_REVIEW
                    || !self.startup_advisor_gate.is_pending()
                {
                    return Err(CoreError::NotAuthorized(format!(
                        "startup advisor gate is {} at stage {}",
                        self.startup_advisor_gate, self.stage
                    )));
                }
                next.startup_advisor_gate = GateStatus::from_decision(decision);
            }
            OpportunityRole::Startup => {
                if self.startup_approval.is_decided() {
                    return Err(CoreError::NotAuthorized(format!(
                        "startup has already {} this opportunity",
                        self.startup_approval
                    )));
                }
                next.startup_approval = ApprovalStatus::from(decision);
            }
        }

        match decision {
            Decision::Approve => next.advance(),
            Decision::Reject => {
                // Stage freezes where it is.
                next.status = OpportunityStatus::Rejected;
            }
        }
        Ok(next)
    }

    /// The lead investor withdraws the listing.
    pub fn close(&self) -> Result<Self, CoreError> {
        if self.status != OpportunityStatus::Active {
            return Err(CoreError::InvalidState(format!(
                "only an active opportunity can be closed, this one is {}",
                self.status
            )));
        }
        let mut next = self.clone();
        next.status = OpportunityStatus::Closed;
        Ok(next)
    }

    /// Human-readable state label used in domain events and error messages.
    pub fn label(&self) -> String {
        match self.status {
            OpportunityStatus::Active => format!("stage_{}", self.stage),
            OpportunityStatus::Closed => "closed".to_string(),
            OpportunityStatus::Rejected => "rejected".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Terms and capacity
// ---------------------------------------------------------------------------

/// Validate the capacity terms of a new opportunity.
pub fn validate_terms(
    investment_amount: Decimal,
    minimum_co: Decimal,
    maximum_co: Decimal,
) -> Result<(), CoreError> {
    if investment_amount <= Decimal::ZERO {
        return Err(CoreError::InvalidTerms(format!(
            "investment_amount must be positive, got {investment_amount}"
        )));
    }
    if minimum_co <= Decimal::ZERO {
        return Err(CoreError::InvalidTerms(format!(
            "minimum_co_investment must be positive, got {minimum_co}"
        )));
    }
    if maximum_co <= Decimal::ZERO {
        return Err(CoreError::InvalidTerms(format!(
            "maximum_co_investment must be positive, got {maximum_co}"
        )));
    }
    if maximum_co > investment_amount {
        return Err(CoreError::InvalidTerms(format!(
            "maximum_co_investment {maximum_co} exceeds investment_amount {investment_amount}"
        )));
    }
    if minimum_co > maximum_co {
        return Err(CoreError::InvalidTerms(format!(
            "minimum_co_investment {minimum_co} exceeds maximum_co_investment {maximum_co}"
        )));
    }
    Ok(())
}

/// The slice the lead keeps for itself.
pub fn lead_invested(investment_amount: Decimal, maximum_co: Decimal) -> Decimal {
    investment_amount - maximum_co
}

/// Capacity still open to co-investors given the accepted total so far.
pub fn remaining_capacity(maximum_co: Decimal, accepted_total: Decimal) -> Decimal {
    maximum_co - accepted_total
}

/// Check that accepting a further `requested` amount keeps the accepted
/// total within `maximum_co`.
///
/// Callers must compute `accepted_total` inside the same transaction as
/// the accepting write; this check is only as good as the snapshot it is
/// given.
pub fn check_capacity(
    maximum_co: Decimal,
    accepted_total: Decimal,
    requested: Decimal,
) -> Result<(), CoreError> {
    let remaining = remaining_capacity(maximum_co, accepted_total);
    if requested > remaining {
        return Err(CoreError::CapacityExceeded {
            requested,
            remaining,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn fresh_with_both_advisors() -> OpportunityState {
        OpportunityState::initial(true, true)
    }

    // -- creation -------------------------------------------------------------

    #[test]
    fn lead_advisor_present_starts_at_stage_1() {
        let state = fresh_with_both_advisors();
        assert_eq!(state.stage, STAGE_LEAD_ADVISOR_REVIEW);
        assert_eq!(state.status, OpportunityStatus::Active);
        assert_eq!(state.startup_approval, ApprovalStatus::Pending);
    }

    #[test]
    fn no_lead_advisor_skips_to_stage_2() {
        let state = OpportunityState::initial(false, true);
        assert_eq!(state.stage, STAGE_STARTUP_ADVISOR_REVIEW);
        assert_eq!(state.lead_advisor_gate, GateStatus::NotRequired);
    }

    #[test]
    fn no_advisors_at_all_still_waits_for_startup() {
        // Both gates not required, but the startup has not approved yet,
        // so a fresh opportunity never starts fully approved.
        let state = OpportunityState::initial(false, false);
        assert_eq!(state.stage, STAGE_STARTUP_ADVISOR_REVIEW);
        assert!(!state.is_open_for_offers());
    }

    // -- sequential gates -----------------------------------------------------

    #[test]
    fn startup_advisor_cannot_decide_at_stage_1() {
        let err = fresh_with_both_advisors()
            .decide(OpportunityRole::StartupAdvisor, Decision::Approve)
            .unwrap_err();
        assert!(matches!(err, CoreError::NotAuthorized(_)));
    }

    #[test]
    fn lead_advisor_approval_advances_to_stage_2() {
        let state = fresh_with_both_advisors()
            .decide(OpportunityRole::LeadInvestorAdvisor, Decision::Approve)
            .unwrap();
        assert_eq!(state.stage, STAGE_STARTUP_ADVISOR_REVIEW);
        assert_eq!(state.lead_advisor_gate, GateStatus::Approved);
    }

    #[test]
    fn lead_advisor_cannot_decide_twice() {
        let state = fresh_with_both_advisors()
            .decide(OpportunityRole::LeadInvestorAdvisor, Decision::Approve)
            .unwrap();
        let err = state
            .decide(OpportunityRole::LeadInvestorAdvisor, Decision::Approve)
            .unwrap_err();
        assert!(matches!(err, CoreError::NotAuthorized(_)));
    }

    // -- startup approval is stage-independent --------------------------------

    #[test]
    fn startup_may_approve_at_stage_1() {
        let state = fresh_with_both_advisors()
            .decide(OpportunityRole::Startup, Decision::Approve)
            .unwrap();
        assert_eq!(state.startup_approval, ApprovalStatus::Approved);
        // Stage unchanged: the lead advisor gate is still pending.
        assert_eq!(state.stage, STAGE_LEAD_ADVISOR_REVIEW);
    }

    #[test]
    fn startup_approval_is_required_in_addition_to_its_advisor() {
        let state = fresh_with_both_advisors()
            .decide(OpportunityRole::LeadInvestorAdvisor, Decision::Approve)
            .unwrap()
            .decide(OpportunityRole::StartupAdvisor, Decision::Approve)
            .unwrap();
        // Both advisor gates clear, startup itself has not approved.
        assert_eq!(state.stage, STAGE_STARTUP_ADVISOR_REVIEW);
        assert!(!state.is_open_for_offers());

        let state = state
            .decide(OpportunityRole::Startup, Decision::Approve)
            .unwrap();
        assert_eq!(state.stage, STAGE_FULLY_APPROVED);
        assert!(state.is_open_for_offers());
    }

    #[test]
    fn early_startup_approval_counts_when_gates_clear_later() {
        let state = fresh_with_both_advisors()
            .decide(OpportunityRole::Startup, Decision::Approve)
            .unwrap()
            .decide(OpportunityRole::LeadInvestorAdvisor, Decision::Approve)
            .unwrap()
            .decide(OpportunityRole::StartupAdvisor, Decision::Approve)
            .unwrap();
        assert_eq!(state.stage, STAGE_FULLY_APPROVED);
    }

    // -- rejections -----------------------------------------------------------

    #[test]
    fn any_reject_makes_the_opportunity_rejected_with_stage_frozen() {
        let by_lead_advisor = fresh_with_both_advisors()
            .decide(OpportunityRole::LeadInvestorAdvisor, Decision::Reject)
            .unwrap();
        assert_eq!(by_lead_advisor.status, OpportunityStatus::Rejected);
        assert_eq!(by_lead_advisor.stage, STAGE_LEAD_ADVISOR_REVIEW);

        let by_startup = fresh_with_both_advisors()
            .decide(OpportunityRole::Startup, Decision::Reject)
            .unwrap();
        assert_eq!(by_startup.status, OpportunityStatus::Rejected);
        assert_eq!(by_startup.startup_approval, ApprovalStatus::Rejected);
    }

    #[test]
    fn decide_on_rejected_opportunity_is_invalid_state() {
        let state = fresh_with_both_advisors()
            .decide(OpportunityRole::LeadInvestorAdvisor, Decision::Reject)
            .unwrap();
        let err = state
            .decide(OpportunityRole::Startup, Decision::Approve)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    #[test]
    fn decide_on_fully_approved_opportunity_is_invalid_state() {
        let state = OpportunityState::initial(false, false)
            .decide(OpportunityRole::Startup, Decision::Approve)
            .unwrap();
        assert_eq!(state.stage, STAGE_FULLY_APPROVED);
        let err = state
            .decide(OpportunityRole::Startup, Decision::Approve)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    // -- close ----------------------------------------------------------------

    #[test]
    fn active_opportunity_can_be_closed() {
        let state = fresh_with_both_advisors().close().unwrap();
        assert_eq!(state.status, OpportunityStatus::Closed);
    }

    #[test]
    fn closed_opportunity_cannot_be_closed_again_or_decided() {
        let state = fresh_with_both_advisors().close().unwrap();
        assert!(matches!(state.close(), Err(CoreError::InvalidState(_))));
        assert!(matches!(
            state.decide(OpportunityRole::LeadInvestorAdvisor, Decision::Approve),
            Err(CoreError::InvalidState(_))
        ));
    }

    // -- terms ----------------------------------------------------------------

    #[test]
    fn valid_terms_pass() {
        assert!(validate_terms(dec!(500000), dec!(10000), dec!(100000)).is_ok());
        // The whole commitment may be opened to co-investors.
        assert!(validate_terms(dec!(500000), dec!(10000), dec!(500000)).is_ok());
    }

    #[test]
    fn max_co_above_investment_amount_is_invalid_terms() {
        assert!(matches!(
            validate_terms(dec!(100000), dec!(10000), dec!(200000)),
            Err(CoreError::InvalidTerms(_))
        ));
    }

    #[test]
    fn min_above_max_is_invalid_terms() {
        assert!(matches!(
            validate_terms(dec!(500000), dec!(200000), dec!(100000)),
            Err(CoreError::InvalidTerms(_))
        ));
    }

    #[test]
    fn non_positive_amounts_are_invalid_terms() {
        assert!(matches!(
            validate_terms(dec!(0), dec!(10000), dec!(100000)),
            Err(CoreError::InvalidTerms(_))
        ));
        assert!(matches!(
            validate_terms(dec!(500000), dec!(0), dec!(100000)),
            Err(CoreError::InvalidTerms(_))
        ));
    }

    // -- capacity -------------------------------------------------------------

    #[test]
    fn lead_invested_is_the_unopened_slice() {
        assert_eq!(lead_invested(dec!(500000), dec!(100000)), dec!(400000));
    }

    #[test]
    fn capacity_allows_filling_to_exactly_the_maximum() {
        assert!(check_capacity(dec!(100000), dec!(0), dec!(60000)).is_ok());
        assert!(check_capacity(dec!(100000), dec!(60000), dec!(40000)).is_ok());
        assert_eq!(remaining_capacity(dec!(100000), dec!(100000)), dec!(0));
    }

    #[test]
    fn any_positive_amount_past_the_maximum_is_capacity_exceeded() {
        let err = check_capacity(dec!(100000), dec!(100000), dec!(1)).unwrap_err();
        match err {
            CoreError::CapacityExceeded {
                requested,
                remaining,
            } => {
                assert_eq!(requested, dec!(1));
                assert_eq!(remaining, dec!(0));
            }
            other => panic!("expected CapacityExceeded, got {other:?}"),
        }
    }

    #[test]
    fn partial_fill_reports_true_remaining() {
        let err = check_capacity(dec!(100000), dec!(70000), dec!(50000)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::CapacityExceeded { remaining, .. } if remaining == dec!(30000)
        ));
    }
}
