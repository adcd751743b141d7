//! Repository for the `advisors` table and advisor-relationship resolution.

use dealflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::party::{Advisor, CreateAdvisor};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, code, email, created_at, updated_at";

/// Same columns qualified for joined queries.
const QUALIFIED: &str = "a.id, a.name, a.code, a.email, a.created_at, a.updated_at";

/// Provides advisor lookup and the effective-relationship joins used by
/// every engine.
pub struct AdvisorRepo;

impl AdvisorRepo {
    /// Insert a new advisor.
    pub async fn create(pool: &PgPool, input: &CreateAdvisor) -> Result<Advisor, sqlx::Error> {
        let query = format!(
            "INSERT INTO advisors (name, code, email)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Advisor>(&query)
            .bind(&input.name)
            .bind(&input.code)
            .bind(&input.email)
            .fetch_one(pool)
            .await
    }

    /// Find an advisor by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Advisor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM advisors WHERE id = $1");
        sqlx::query_as::<_, Advisor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an advisor by its unique linking code.
    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Advisor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM advisors WHERE code = $1");
        sqlx::query_as::<_, Advisor>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    // ── Relationship resolution ──────────────────────────────────────

    /// Resolve the investor's effective advisor, if any.
    ///
    /// Effective means the investor's entered code matches the advisor's
    /// code and the acceptance flag is set. "Entered but not accepted"
    /// resolves to `None`.
    pub async fn resolve_for_investor(
        pool: &PgPool,
        investor_id: DbId,
    ) -> Result<Option<Advisor>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED} FROM advisors a
             JOIN investors i ON i.advisor_code_entered = a.code AND i.advisor_accepted
             WHERE i.id = $1"
        );
        sqlx::query_as::<_, Advisor>(&query)
            .bind(investor_id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve the startup's effective advisor, if any.
    pub async fn resolve_for_startup(
        pool: &PgPool,
        startup_id: DbId,
    ) -> Result<Option<Advisor>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED} FROM advisors a
             JOIN startups s ON s.advisor_code_entered = a.code AND s.advisor_accepted
             WHERE s.id = $1"
        );
        sqlx::query_as::<_, Advisor>(&query)
            .bind(startup_id)
            .fetch_optional(pool)
            .await
    }
}
