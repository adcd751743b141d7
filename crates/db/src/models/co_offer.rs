//! Co-investment offer rows (PRD-15).

use dealflow_core::co_offer::CoOfferStatus;
use dealflow_core::gate::ApprovalStatus;
use dealflow_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `co_investment_offers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CoInvestmentOffer {
    pub id: DbId,
    pub opportunity_id: DbId,
    pub investor_id: DbId,
    pub amount: Decimal,
    pub status: CoOfferStatus,
    /// Record of the participating investor's advisor step. NULL when the
    /// investor had no effective advisor at creation; the step then never
    /// existed for this offer.
    pub investor_advisor_status: Option<ApprovalStatus>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for joining an opportunity.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCoInvestmentOffer {
    pub opportunity_id: DbId,
    pub investor_id: DbId,
    pub amount: Decimal,
}
