//! Repository for the `startups` table.

use dealflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::party::{CreateStartup, Startup};

const COLUMNS: &str = "id, name, contact_email, contact_phone, advisor_code_entered, \
    advisor_accepted, created_at, updated_at";

pub struct StartupRepo;

impl StartupRepo {
    /// Insert a new startup. `advisor_accepted` defaults to `false`.
    pub async fn create(pool: &PgPool, input: &CreateStartup) -> Result<Startup, sqlx::Error> {
        let query = format!(
            "INSERT INTO startups
                (name, contact_email, contact_phone, advisor_code_entered, advisor_accepted)
             VALUES ($1, $2, $3, $4, COALESCE($5, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Startup>(&query)
            .bind(&input.name)
            .bind(&input.contact_email)
            .bind(&input.contact_phone)
            .bind(&input.advisor_code_entered)
            .bind(input.advisor_accepted)
            .fetch_one(pool)
            .await
    }

    /// Find a startup by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Startup>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM startups WHERE id = $1");
        sqlx::query_as::<_, Startup>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
