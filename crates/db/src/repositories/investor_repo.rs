//! Repository for the `investors` table.

use dealflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::party::{CreateInvestor, Investor};

const COLUMNS: &str = "id, name, contact_email, contact_phone, advisor_code_entered, \
    advisor_accepted, created_at, updated_at";

pub struct InvestorRepo;

impl InvestorRepo {
    /// Insert a new investor. `advisor_accepted` defaults to `false`.
    pub async fn create(pool: &PgPool, input: &CreateInvestor) -> Result<Investor, sqlx::Error> {
        let query = format!(
            "INSERT INTO investors
                (name, contact_email, contact_phone, advisor_code_entered, advisor_accepted)
             VALUES ($1, $2, $3, $4, COALESCE($5, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Investor>(&query)
            .bind(&input.name)
            .bind(&input.contact_email)
            .bind(&input.contact_phone)
            .bind(&input.advisor_code_entered)
            .bind(input.advisor_accepted)
            .fetch_one(pool)
            .await
    }

    /// Find an investor by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Investor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM investors WHERE id = $1");
        sqlx::query_as::<_, Investor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
