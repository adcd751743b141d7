//! Co-investment offer state machine (PRD-15).
//!
//! A co-investment offer is an investor's request to join an existing
//! opportunity. Unlike regular offers there are no independent gates: the
//! status itself is a linear chain of pending steps, each owned by exactly
//! one role, with a role-specific rejected branch off every step. An
//! investor without an effective advisor skips the first step entirely,
//! starting at `pending_lead_investor_approval`; the skipped step never
//! appears in the offer's history.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::gate::Decision;

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// The three roles that decide a co-investment offer, in chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoOfferRole {
    /// The participating investor's own advisor.
    InvestorAdvisor,
    /// The investor who listed the opportunity.
    LeadInvestor,
    /// The startup being invested in.
    Startup,
}

impl CoOfferRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvestorAdvisor => "investor_advisor",
            Self::LeadInvestor => "lead_investor",
            Self::Startup => "startup",
        }
    }
}

impl fmt::Display for CoOfferRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Status chain
// ---------------------------------------------------------------------------

/// Status of a co-investment offer.
///
/// `Rejected` (unqualified) is the startup's reject branch; the other two
/// rejected statuses name the role that stopped the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CoOfferStatus {
    PendingInvestorAdvisorApproval,
    PendingLeadInvestorApproval,
    PendingStartupApproval,
    Accepted,
    InvestorAdvisorRejected,
    LeadInvestorRejected,
    Rejected,
}

impl CoOfferStatus {
    /// Status of a freshly created offer. The advisor step only exists for
    /// investors with an effective advisor.
    pub fn initial(investor_has_advisor: bool) -> Self {
        if investor_has_advisor {
            Self::PendingInvestorAdvisorApproval
        } else {
            Self::PendingLeadInvestorApproval
        }
    }

    /// The role whose decision this status waits on, or `None` on a
    /// terminal status.
    pub fn awaiting(self) -> Option<CoOfferRole> {
        match self {
            Self::PendingInvestorAdvisorApproval => Some(CoOfferRole::InvestorAdvisor),
            Self::PendingLeadInvestorApproval => Some(CoOfferRole::LeadInvestor),
            Self::PendingStartupApproval => Some(CoOfferRole::Startup),
            Self::Accepted
            | Self::InvestorAdvisorRejected
            | Self::LeadInvestorRejected
            | Self::Rejected => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.awaiting().is_none()
    }

    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Apply a role's decision, returning the next status in the chain.
    ///
    /// A terminal offer fails `InvalidState` before any role check, so a
    /// double-submit surfaces as `InvalidState` rather than `NotAuthorized`.
    /// The wrong role at a pending step fails `NotAuthorized`.
    pub fn decide(self, role: CoOfferRole, decision: Decision) -> Result<Self, CoreError> {
        let Some(expected) = self.awaiting() else {
            return Err(CoreError::InvalidState(format!(
                "co-investment offer is already {self}"
            )));
        };
        if expected != role {
            return Err(CoreError::NotAuthorized(format!(
                "co-investment offer is awaiting {expected}, not {role}"
            )));
        }
        Ok(match (expected, decision) {
            (CoOfferRole::InvestorAdvisor, Decision::Approve) => Self::PendingLeadInvestorApproval,
            (CoOfferRole::InvestorAdvisor, Decision::Reject) => Self::InvestorAdvisorRejected,
            (CoOfferRole::LeadInvestor, Decision::Approve) => Self::PendingStartupApproval,
            (CoOfferRole::LeadInvestor, Decision::Reject) => Self::LeadInvestorRejected,
            (CoOfferRole::Startup, Decision::Approve) => Self::Accepted,
            (CoOfferRole::Startup, Decision::Reject) => Self::Rejected,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PendingInvestorAdvisorApproval => "pending_investor_advisor_approval",
            Self::PendingLeadInvestorApproval => "pending_lead_investor_approval",
            Self::PendingStartupApproval => "pending_startup_approval",
            Self::Accepted => "accepted",
            Self::InvestorAdvisorRejected => "investor_advisor_rejected",
            Self::LeadInvestorRejected => "lead_investor_rejected",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for CoOfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Amount validation
// ---------------------------------------------------------------------------

/// Validate a requested co-investment amount against the opportunity's
/// per-offer bounds.
///
/// This is a structural check at creation; whether capacity remains is
/// decided later, inside the accepting transaction.
pub fn validate_amount(
    amount: Decimal,
    minimum_co: Decimal,
    maximum_co: Decimal,
) -> Result<(), CoreError> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::InvalidTerms(format!(
            "co-investment amount must be positive, got {amount}"
        )));
    }
    if amount < minimum_co {
        return Err(CoreError::InvalidTerms(format!(
            "co-investment amount {amount} is below the minimum {minimum_co}"
        )));
    }
    if amount > maximum_co {
        return Err(CoreError::InvalidTerms(format!(
            "co-investment amount {amount} exceeds the maximum {maximum_co}"
        )));
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

    // -- creation -------------------------------------------------------------

    #[test]
    fn investor_with_advisor_starts_at_advisor_step() {
        assert_eq!(
            CoOfferStatus::initial(true),
            CoOfferStatus::PendingInvestorAdvisorApproval
        );
    }

    #[test]
    fn investor_without_advisor_skips_to_lead_step() {
        assert_eq!(
            CoOfferStatus::initial(false),
            CoOfferStatus::PendingLeadInvestorApproval
        );
    }

    // -- chain ----------------------------------------------------------------

    #[test]
    fn full_approval_chain_reaches_accepted() {
        let status = CoOfferStatus::initial(true)
            .decide(CoOfferRole::InvestorAdvisor, Decision::Approve)
            .unwrap()
            .decide(CoOfferRole::LeadInvestor, Decision::Approve)
            .unwrap()
            .decide(CoOfferRole::Startup, Decision::Approve)
            .unwrap();
        assert_eq!(status, CoOfferStatus::Accepted);
        assert!(status.is_terminal());
    }

    #[test]
    fn awaiting_follows_the_chain() {
        assert_eq!(
            CoOfferStatus::PendingInvestorAdvisorApproval.awaiting(),
            Some(CoOfferRole::InvestorAdvisor)
        );
        assert_eq!(
            CoOfferStatus::PendingLeadInvestorApproval.awaiting(),
            Some(CoOfferRole::LeadInvestor)
        );
        assert_eq!(
            CoOfferStatus::PendingStartupApproval.awaiting(),
            Some(CoOfferRole::Startup)
        );
        assert_eq!(CoOfferStatus::Accepted.awaiting(), None);
        assert_eq!(CoOfferStatus::Rejected.awaiting(), None);
    }

    // -- rejection branches ---------------------------------------------------

    #[test]
    fn advisor_rejection_is_terminal() {
        let status = CoOfferStatus::initial(true)
            .decide(CoOfferRole::InvestorAdvisor, Decision::Reject)
            .unwrap();
        assert_eq!(status, CoOfferStatus::InvestorAdvisorRejected);
        assert!(status.is_terminal());

        // No further transitions: every subsequent decide is InvalidState.
        for role in [
            CoOfferRole::InvestorAdvisor,
            CoOfferRole::LeadInvestor,
            CoOfferRole::Startup,
        ] {
            assert!(matches!(
                status.decide(role, Decision::Approve),
                Err(CoreError::InvalidState(_))
            ));
        }
    }

    #[test]
    fn lead_rejection_has_its_own_branch() {
        let status = CoOfferStatus::PendingLeadInvestorApproval
            .decide(CoOfferRole::LeadInvestor, Decision::Reject)
            .unwrap();
        assert_eq!(status, CoOfferStatus::LeadInvestorRejected);
    }

    #[test]
    fn startup_rejection_uses_catch_all_branch() {
        let status = CoOfferStatus::PendingStartupApproval
            .decide(CoOfferRole::Startup, Decision::Reject)
            .unwrap();
        assert_eq!(status, CoOfferStatus::Rejected);
    }

    // -- authorization --------------------------------------------------------

    #[test]
    fn wrong_role_is_not_authorized() {
        let err = CoOfferStatus::PendingLeadInvestorApproval
            .decide(CoOfferRole::Startup, Decision::Approve)
            .unwrap_err();
        assert!(matches!(err, CoreError::NotAuthorized(_)));

        let err = CoOfferStatus::PendingInvestorAdvisorApproval
            .decide(CoOfferRole::LeadInvestor, Decision::Approve)
            .unwrap_err();
        assert!(matches!(err, CoreError::NotAuthorized(_)));
    }

    #[test]
    fn decide_on_accepted_offer_is_invalid_state() {
        let err = CoOfferStatus::Accepted
            .decide(CoOfferRole::Startup, Decision::Approve)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    // -- amount bounds --------------------------------------------------------

    #[test]
    fn amount_within_bounds_is_valid() {
        assert!(validate_amount(dec!(25000), dec!(10000), dec!(100000)).is_ok());
        assert!(validate_amount(dec!(10000), dec!(10000), dec!(100000)).is_ok());
        assert!(validate_amount(dec!(100000), dec!(10000), dec!(100000)).is_ok());
    }

    #[test]
    fn amount_outside_bounds_is_invalid_terms() {
        assert!(matches!(
            validate_amount(dec!(5000), dec!(10000), dec!(100000)),
            Err(CoreError::InvalidTerms(_))
        ));
        assert!(matches!(
            validate_amount(dec!(150000), dec!(10000), dec!(100000)),
            Err(CoreError::InvalidTerms(_))
        ));
        assert!(matches!(
            validate_amount(dec!(0), dec!(0), dec!(100000)),
            Err(CoreError::InvalidTerms(_))
        ));
    }
}
