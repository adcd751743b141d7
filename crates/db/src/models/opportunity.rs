//! Co-investment opportunity rows (PRD-15).

use dealflow_core::gate::{ApprovalStatus, GateStatus};
use dealflow_core::opportunity::{self, OpportunityState, OpportunityStatus};
use dealflow_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `co_investment_opportunities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CoInvestmentOpportunity {
    pub id: DbId,
    pub startup_id: DbId,
    pub lead_investor_id: DbId,
    /// The lead investor's total commitment.
    pub investment_amount: Decimal,
    pub minimum_co_investment: Decimal,
    /// The slice of the commitment open to co-investors.
    pub maximum_co_investment: Decimal,
    pub stage: i16,
    pub status: OpportunityStatus,
    pub lead_advisor_status: GateStatus,
    pub startup_advisor_status: GateStatus,
    /// The startup's own decision, independent of its advisor's gate.
    pub startup_status: ApprovalStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CoInvestmentOpportunity {
    /// The transition-relevant slice of the row.
    pub fn state(&self) -> OpportunityState {
        OpportunityState {
            stage: self.stage,
            status: self.status,
            lead_advisor_gate: self.lead_advisor_status,
            startup_advisor_gate: self.startup_advisor_status,
            startup_approval: self.startup_status,
        }
    }

    /// Capacity summary given the accepted co-investment total, which the
    /// caller computes (inside a transaction when it guards a write).
    pub fn capacity(&self, accepted_total: Decimal) -> CapacitySummary {
        CapacitySummary {
            investment_amount: self.investment_amount,
            minimum_co_investment: self.minimum_co_investment,
            maximum_co_investment: self.maximum_co_investment,
            lead_invested: opportunity::lead_invested(
                self.investment_amount,
                self.maximum_co_investment,
            ),
            accepted_total,
            remaining: opportunity::remaining_capacity(self.maximum_co_investment, accepted_total),
        }
    }
}

/// Derived capacity figures for an opportunity. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacitySummary {
    pub investment_amount: Decimal,
    pub minimum_co_investment: Decimal,
    pub maximum_co_investment: Decimal,
    pub lead_invested: Decimal,
    pub accepted_total: Decimal,
    pub remaining: Decimal,
}

/// DTO for creating a new opportunity listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCoInvestmentOpportunity {
    pub startup_id: DbId,
    pub lead_investor_id: DbId,
    pub investment_amount: Decimal,
    pub minimum_co_investment: Decimal,
    pub maximum_co_investment: Decimal,
}
