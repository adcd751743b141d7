//! Persisted domain event rows (PRD-04).

use dealflow_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// DTO for recording an event emitted on the bus.
#[derive(Debug, Clone)]
pub struct CreateDomainEvent {
    pub event_id: Uuid,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: DbId,
    pub previous_state: String,
    pub new_state: String,
    pub actor: String,
    pub payload: serde_json::Value,
}

/// A row from the `domain_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DomainEventRecord {
    pub id: DbId,
    /// Bus-assigned id, unique per emission; the dedup key for replays.
    pub event_id: Uuid,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: DbId,
    pub previous_state: String,
    pub new_state: String,
    pub actor: String,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}
