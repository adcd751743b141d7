//! Repository for the `co_investment_opportunities` table.

use dealflow_core::opportunity::OpportunityState;
use dealflow_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::opportunity::{CoInvestmentOpportunity, CreateCoInvestmentOpportunity};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, startup_id, lead_investor_id, investment_amount, \
    minimum_co_investment, maximum_co_investment, stage, status, lead_advisor_status, \
    startup_advisor_status, startup_status, created_at, updated_at";

/// Same columns qualified for joined queries.
const QUALIFIED: &str = "op.id, op.startup_id, op.lead_investor_id, op.investment_amount, \
    op.minimum_co_investment, op.maximum_co_investment, op.stage, op.status, \
    op.lead_advisor_status, op.startup_advisor_status, op.startup_status, \
    op.created_at, op.updated_at";

/// Provides persistence for co-investment opportunity listings.
pub struct OpportunityRepo;

impl OpportunityRepo {
    // ── CRUD ─────────────────────────────────────────────────────────

    /// Insert a new opportunity with its engine-computed initial state.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCoInvestmentOpportunity,
        state: &OpportunityState,
    ) -> Result<CoInvestmentOpportunity, sqlx::Error> {
        let query = format!(
            "INSERT INTO co_investment_opportunities
                (startup_id, lead_investor_id, investment_amount, minimum_co_investment,
                 maximum_co_investment, stage, status, lead_advisor_status,
                 startup_advisor_status, startup_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CoInvestmentOpportunity>(&query)
            .bind(input.startup_id)
            .bind(input.lead_investor_id)
            .bind(input.investment_amount)
            .bind(input.minimum_co_investment)
            .bind(input.maximum_co_investment)
            .bind(state.stage)
            .bind(state.status)
            .bind(state.lead_advisor_gate)
            .bind(state.startup_advisor_gate)
            .bind(state.startup_approval)
            .fetch_one(pool)
            .await
    }

    /// Find an opportunity by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CoInvestmentOpportunity>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM co_investment_opportunities WHERE id = $1");
        sqlx::query_as::<_, CoInvestmentOpportunity>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // ── Transactional state transitions ──────────────────────────────

    /// Read an opportunity under a row lock held until the surrounding
    /// transaction ends. The capacity check for accepting co-investment
    /// offers runs while this lock is held.
    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<CoInvestmentOpportunity>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM co_investment_opportunities WHERE id = $1 FOR UPDATE"
        );
        sqlx::query_as::<_, CoInvestmentOpportunity>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Persist an engine-computed next state.
    pub async fn update_state(
        conn: &mut PgConnection,
        id: DbId,
        state: &OpportunityState,
    ) -> Result<CoInvestmentOpportunity, sqlx::Error> {
        let query = format!(
            "UPDATE co_investment_opportunities SET
                stage = $2,
                status = $3,
                lead_advisor_status = $4,
                startup_advisor_status = $5,
                startup_status = $6,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CoInvestmentOpportunity>(&query)
            .bind(id)
            .bind(state.stage)
            .bind(state.status)
            .bind(state.lead_advisor_gate)
            .bind(state.startup_advisor_gate)
            .bind(state.startup_approval)
            .fetch_one(conn)
            .await
    }

    // ── Advisor inbox ────────────────────────────────────────────────

    /// Opportunities awaiting the given advisor as the lead investor's
    /// advisor: active, at stage 1, gate still pending.
    pub async fn list_awaiting_lead_advisor(
        pool: &PgPool,
        advisor_id: DbId,
    ) -> Result<Vec<CoInvestmentOpportunity>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED} FROM co_investment_opportunities op
             JOIN investors i ON op.lead_investor_id = i.id
             JOIN advisors a ON i.advisor_code_entered = a.code AND i.advisor_accepted
             WHERE a.id = $1
               AND op.status = 'active'
               AND op.stage = 1
               AND op.lead_advisor_status = 'pending'
             ORDER BY op.created_at DESC"
        );
        sqlx::query_as::<_, CoInvestmentOpportunity>(&query)
            .bind(advisor_id)
            .fetch_all(pool)
            .await
    }

    /// Opportunities awaiting the given advisor as the startup's advisor:
    /// active, at stage 2, gate still pending.
    pub async fn list_awaiting_startup_advisor(
        pool: &PgPool,
        advisor_id: DbId,
    ) -> Result<Vec<CoInvestmentOpportunity>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED} FROM co_investment_opportunities op
             JOIN startups s ON op.startup_id = s.id
             JOIN advisors a ON s.advisor_code_entered = a.code AND s.advisor_accepted
             WHERE a.id = $1
               AND op.status = 'active'
               AND op.stage = 2
               AND op.startup_advisor_status = 'pending'
             ORDER BY op.created_at DESC"
        );
        sqlx::query_as::<_, CoInvestmentOpportunity>(&query)
            .bind(advisor_id)
            .fetch_all(pool)
            .await
    }
}
