//! Repository for the `offers` table.

use dealflow_core::offer::OfferState;
use dealflow_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::offer::{CreateOffer, Offer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, investor_id, startup_id, amount, equity_percent, currency, \
    stage, status, investor_advisor_status, startup_advisor_status, contact_revealed, \
    created_at, updated_at";

/// Same columns qualified for joined queries.
const QUALIFIED: &str = "o.id, o.investor_id, o.startup_id, o.amount, o.equity_percent, \
    o.currency, o.stage, o.status, o.investor_advisor_status, o.startup_advisor_status, \
    o.contact_revealed, o.created_at, o.updated_at";

/// Provides persistence for regular offers, including the row-locking
/// reads the stage engine uses to serialize decisions.
pub struct OfferRepo;

impl OfferRepo {
    // ── CRUD ─────────────────────────────────────────────────────────

    /// Insert a new offer with its engine-computed initial state.
    pub async fn create(
        pool: &PgPool,
        input: &CreateOffer,
        state: &OfferState,
    ) -> Result<Offer, sqlx::Error> {
        let query = format!(
            "INSERT INTO offers
                (investor_id, startup_id, amount, equity_percent, currency,
                 stage, status, investor_advisor_status, startup_advisor_status,
                 contact_revealed)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Offer>(&query)
            .bind(input.investor_id)
            .bind(input.startup_id)
            .bind(input.amount)
            .bind(input.equity_percent)
            .bind(&input.currency)
            .bind(state.stage)
            .bind(state.status)
            .bind(state.investor_gate)
            .bind(state.startup_gate)
            .bind(state.contact_revealed)
            .fetch_one(pool)
            .await
    }

    /// Find an offer by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Offer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM offers WHERE id = $1");
        sqlx::query_as::<_, Offer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all offers between the given investor and startup, newest first.
    pub async fn list_between(
        pool: &PgPool,
        investor_id: DbId,
        startup_id: DbId,
    ) -> Result<Vec<Offer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM offers
             WHERE investor_id = $1 AND startup_id = $2
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Offer>(&query)
            .bind(investor_id)
            .bind(startup_id)
            .fetch_all(pool)
            .await
    }

    // ── Transactional state transitions ──────────────────────────────

    /// Read an offer under a row lock held until the surrounding
    /// transaction ends. Concurrent transitions on the same offer
    /// serialize here.
    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Offer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM offers WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Offer>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Persist an engine-computed next state.
    pub async fn update_state(
        conn: &mut PgConnection,
        id: DbId,
        state: &OfferState,
    ) -> Result<Offer, sqlx::Error> {
        let query = format!(
            "UPDATE offers SET
                stage = $2,
                status = $3,
                investor_advisor_status = $4,
                startup_advisor_status = $5,
                contact_revealed = $6,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Offer>(&query)
            .bind(id)
            .bind(state.stage)
            .bind(state.status)
            .bind(state.investor_gate)
            .bind(state.startup_gate)
            .bind(state.contact_revealed)
            .fetch_one(conn)
            .await
    }

    // ── Advisor inbox ────────────────────────────────────────────────

    /// Offers whose investor-side gate belongs to the given advisor via an
    /// effective relationship, excluding gates that never applied.
    ///
    /// The caller splits pending (awaiting action) from decided (audit).
    pub async fn list_for_investor_side_advisor(
        pool: &PgPool,
        advisor_id: DbId,
    ) -> Result<Vec<Offer>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED} FROM offers o
             JOIN investors i ON o.investor_id = i.id
             JOIN advisors a ON i.advisor_code_entered = a.code AND i.advisor_accepted
             WHERE a.id = $1 AND o.investor_advisor_status <> 'not_required'
             ORDER BY o.created_at DESC"
        );
        sqlx::query_as::<_, Offer>(&query)
            .bind(advisor_id)
            .fetch_all(pool)
            .await
    }

    /// Offers whose startup-side gate belongs to the given advisor via an
    /// effective relationship, excluding gates that never applied.
    pub async fn list_for_startup_side_advisor(
        pool: &PgPool,
        advisor_id: DbId,
    ) -> Result<Vec<Offer>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED} FROM offers o
             JOIN startups s ON o.startup_id = s.id
             JOIN advisors a ON s.advisor_code_entered = a.code AND s.advisor_accepted
             WHERE a.id = $1 AND o.startup_advisor_status <> 'not_required'
             ORDER BY o.created_at DESC"
        );
        sqlx::query_as::<_, Offer>(&query)
            .bind(advisor_id)
            .fetch_all(pool)
            .await
    }
}
