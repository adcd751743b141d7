//! Approval gate statuses and decision vocabulary (PRD-12).
//!
//! A gate is a named approval checkpoint held by a specific actor role.
//! Whether a gate applies at all is data-dependent: a party without an
//! effective advisor gets a `not_required` gate, resolved once at entity
//! creation so the transition tables stay uniform instead of re-checking
//! "does an advisor exist" on every decision.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Gate status
// ---------------------------------------------------------------------------

/// Status of a single advisor gate.
///
/// `NotRequired` counts as satisfied for stage advancement but is a distinct
/// value from `Approved` and is surfaced verbatim to clients; it must never
/// be displayed as an approval nobody gave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GateStatus {
    /// The party had no effective advisor at creation time.
    NotRequired,
    /// Waiting on the advisor's decision.
    Pending,
    Approved,
    Rejected,
}

impl GateStatus {
    /// Initial gate value for a party, from whether an effective advisor
    /// relationship was resolved at creation time.
    pub fn for_party(has_advisor: bool) -> Self {
        if has_advisor {
            Self::Pending
        } else {
            Self::NotRequired
        }
    }

    /// Gate value recording an advisor's decision.
    pub fn from_decision(decision: Decision) -> Self {
        match decision {
            Decision::Approve => Self::Approved,
            Decision::Reject => Self::Rejected,
        }
    }

    /// A clear gate no longer blocks stage advancement.
    pub fn is_clear(self) -> bool {
        matches!(self, Self::NotRequired | Self::Approved)
    }

    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotRequired => "not_required",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for GateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

/// Outcome submitted by a deciding actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Approval status
// ---------------------------------------------------------------------------

/// Three-valued decision record for approvals that are always required
/// (a startup's own decision on an opportunity) or tracked per actor (a
/// co-investment participant's advisor step).
///
/// Unlike [`GateStatus`] there is no `not_required`: where the step does
/// not apply it is absent altogether, never auto-approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn is_decided(self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl From<Decision> for ApprovalStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approve => Self::Approved,
            Decision::Reject => Self::Rejected,
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
