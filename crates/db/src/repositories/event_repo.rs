//! Repository for the `domain_events` table (PRD-04).

use dealflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::{CreateDomainEvent, DomainEventRecord};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, event_id, event_type, entity_type, entity_id, previous_state, \
    new_state, actor, payload, created_at";

/// Provides the durable write behind the event bus plus audit-trail reads.
pub struct DomainEventRepo;

impl DomainEventRepo {
    /// Insert an event row, deduplicating on `event_id`.
    ///
    /// Delivery from the bus is at-least-once; a replay of an already
    /// recorded event returns `None` and leaves the table unchanged.
    pub async fn insert(
        pool: &PgPool,
        input: &CreateDomainEvent,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO domain_events \
                (event_id, event_type, entity_type, entity_id, previous_state, \
                 new_state, actor, payload) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (event_id) DO NOTHING \
             RETURNING id",
        )
        .bind(input.event_id)
        .bind(&input.event_type)
        .bind(&input.entity_type)
        .bind(input.entity_id)
        .bind(&input.previous_state)
        .bind(&input.new_state)
        .bind(&input.actor)
        .bind(&input.payload)
        .fetch_optional(pool)
        .await
    }

    /// Audit trail for one entity, oldest first.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<Vec<DomainEventRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM domain_events
             WHERE entity_type = $1 AND entity_id = $2
             ORDER BY id"
        );
        sqlx::query_as::<_, DomainEventRecord>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }

    /// Most recent events across all entities, newest first.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<DomainEventRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM domain_events
             ORDER BY id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, DomainEventRecord>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
