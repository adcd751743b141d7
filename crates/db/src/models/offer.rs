//! Regular investment offer rows (PRD-12).

use dealflow_core::gate::GateStatus;
use dealflow_core::offer::{OfferState, OfferStatus};
use dealflow_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `offers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Offer {
    pub id: DbId,
    pub investor_id: DbId,
    pub startup_id: DbId,
    pub amount: Decimal,
    pub equity_percent: Decimal,
    /// ISO-4217 currency code, stored verbatim.
    pub currency: String,
    pub stage: i16,
    pub status: OfferStatus,
    pub investor_advisor_status: GateStatus,
    pub startup_advisor_status: GateStatus,
    pub contact_revealed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Offer {
    /// The transition-relevant slice of the row.
    pub fn state(&self) -> OfferState {
        OfferState {
            stage: self.stage,
            status: self.status,
            investor_gate: self.investor_advisor_status,
            startup_gate: self.startup_advisor_status,
            contact_revealed: self.contact_revealed,
        }
    }
}

/// DTO for creating a new offer. Terms are immutable once created.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOffer {
    pub investor_id: DbId,
    pub startup_id: DbId,
    pub amount: Decimal,
    pub equity_percent: Decimal,
    pub currency: String,
}
