//! Repository for the `co_investment_offers` table.

use dealflow_core::co_offer::CoOfferStatus;
use dealflow_core::gate::ApprovalStatus;
use dealflow_core::types::DbId;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::models::co_offer::{CoInvestmentOffer, CreateCoInvestmentOffer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, opportunity_id, investor_id, amount, status, \
    investor_advisor_status, created_at, updated_at";

/// Same columns qualified for joined queries.
const QUALIFIED: &str = "co.id, co.opportunity_id, co.investor_id, co.amount, co.status, \
    co.investor_advisor_status, co.created_at, co.updated_at";

/// Provides persistence for co-investment participation offers.
pub struct CoOfferRepo;

impl CoOfferRepo {
    // ── CRUD ─────────────────────────────────────────────────────────

    /// Insert a new co-investment offer.
    ///
    /// `advisor_status` is `Some(Pending)` when the participating investor
    /// has an effective advisor, `None` when the step never exists.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCoInvestmentOffer,
        status: CoOfferStatus,
        advisor_status: Option<ApprovalStatus>,
    ) -> Result<CoInvestmentOffer, sqlx::Error> {
        let query = format!(
            "INSERT INTO co_investment_offers
                (opportunity_id, investor_id, amount, status, investor_advisor_status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CoInvestmentOffer>(&query)
            .bind(input.opportunity_id)
            .bind(input.investor_id)
            .bind(input.amount)
            .bind(status)
            .bind(advisor_status)
            .fetch_one(pool)
            .await
    }

    /// Find a co-investment offer by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CoInvestmentOffer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM co_investment_offers WHERE id = $1");
        sqlx::query_as::<_, CoInvestmentOffer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all offers against an opportunity, oldest first.
    pub async fn list_for_opportunity(
        pool: &PgPool,
        opportunity_id: DbId,
    ) -> Result<Vec<CoInvestmentOffer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM co_investment_offers
             WHERE opportunity_id = $1
             ORDER BY created_at"
        );
        sqlx::query_as::<_, CoInvestmentOffer>(&query)
            .bind(opportunity_id)
            .fetch_all(pool)
            .await
    }

    // ── Transactional state transitions ──────────────────────────────

    /// Read a co-investment offer under a row lock held until the
    /// surrounding transaction ends.
    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<CoInvestmentOffer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM co_investment_offers WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, CoInvestmentOffer>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Persist a status transition decided by the lead investor or the
    /// startup.
    pub async fn update_status(
        conn: &mut PgConnection,
        id: DbId,
        status: CoOfferStatus,
    ) -> Result<CoInvestmentOffer, sqlx::Error> {
        let query = format!(
            "UPDATE co_investment_offers SET
                status = $2,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CoInvestmentOffer>(&query)
            .bind(id)
            .bind(status)
            .fetch_one(conn)
            .await
    }

    /// Persist the participating investor's advisor step decision along
    /// with the chain transition it causes.
    pub async fn record_advisor_decision(
        conn: &mut PgConnection,
        id: DbId,
        status: CoOfferStatus,
        advisor_status: ApprovalStatus,
    ) -> Result<CoInvestmentOffer, sqlx::Error> {
        let query = format!(
            "UPDATE co_investment_offers SET
                status = $2,
                investor_advisor_status = $3,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CoInvestmentOffer>(&query)
            .bind(id)
            .bind(status)
            .bind(advisor_status)
            .fetch_one(conn)
            .await
    }

    /// Sum of already-accepted amounts against an opportunity.
    ///
    /// Runs on the caller's connection so the accepting transaction can
    /// compute it while holding the opportunity row lock.
    pub async fn accepted_total_for_opportunity(
        conn: &mut PgConnection,
        opportunity_id: DbId,
    ) -> Result<Decimal, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM co_investment_offers \
             WHERE opportunity_id = $1 AND status = 'accepted'",
        )
        .bind(opportunity_id)
        .fetch_one(conn)
        .await
    }

    // ── Advisor inbox ────────────────────────────────────────────────

    /// Co-investment offers whose participating investor resolves to the
    /// given advisor and whose advisor step exists, awaiting or decided.
    ///
    /// The caller splits pending (awaiting action) from decided (audit).
    pub async fn list_for_participant_advisor(
        pool: &PgPool,
        advisor_id: DbId,
    ) -> Result<Vec<CoInvestmentOffer>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED} FROM co_investment_offers co
             JOIN investors i ON co.investor_id = i.id
             JOIN advisors a ON i.advisor_code_entered = a.code AND i.advisor_accepted
             WHERE a.id = $1 AND co.investor_advisor_status IS NOT NULL
             ORDER BY co.created_at DESC"
        );
        sqlx::query_as::<_, CoInvestmentOffer>(&query)
            .bind(advisor_id)
            .fetch_all(pool)
            .await
    }
}
