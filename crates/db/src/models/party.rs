//! Advisor, investor, and startup rows (PRD-07).
//!
//! These tables are written by the surrounding platform; the engines read
//! them to resolve advisor relationships and to serve contact details once
//! an offer reveals them. The create DTOs exist for seeding and for the
//! platform's own onboarding flows.

use dealflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `advisors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Advisor {
    pub id: DbId,
    pub name: String,
    /// The advisor's own unique linking code.
    pub code: String,
    pub email: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `investors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Investor {
    pub id: DbId,
    pub name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    /// Advisor code the investor entered, if any. Only effective once the
    /// advisor accepts.
    pub advisor_code_entered: Option<String>,
    pub advisor_accepted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `startups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Startup {
    pub id: DbId,
    pub name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub advisor_code_entered: Option<String>,
    pub advisor_accepted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an advisor.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAdvisor {
    pub name: String,
    pub code: String,
    pub email: String,
}

/// DTO for creating an investor.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvestor {
    pub name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub advisor_code_entered: Option<String>,
    pub advisor_accepted: Option<bool>,
}

/// DTO for creating a startup.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStartup {
    pub name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub advisor_code_entered: Option<String>,
    pub advisor_accepted: Option<bool>,
}
