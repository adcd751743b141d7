//! The audit-trail writer.
//!
//! [`EventPersistence`] holds one subscription on the
//! [`EventBus`](crate::bus::EventBus) and copies each [`DomainEvent`] it
//! receives into the `domain_events` table. It is spawned once at startup
//! and winds down on its own once the bus sender is dropped.

use dealflow_db::models::event::CreateDomainEvent;
use dealflow_db::repositories::DomainEventRepo;
use dealflow_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::DomainEvent;

/// Background service that persists domain events to the database.
pub struct EventPersistence;

impl EventPersistence {
    /// Drain `receiver` into the `domain_events` table until the channel
    /// closes.
    ///
    /// Delivery is at-least-once; the `event_id` dedup key in the insert
    /// absorbs replays. Buffered events are still delivered after the
    /// sender side is dropped, so nothing published before shutdown is
    /// lost.
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<DomainEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::persist(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Event could not be persisted"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Persistence fell behind the bus");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Bus closed, stopping event persistence");
                    break;
                }
            }
        }
    }

    /// Write a single event to the `domain_events` table.
    ///
    /// A `None` return from the repository means the `event_id` was already
    /// recorded; replays are dropped without logging at error level.
    async fn persist(pool: &DbPool, event: &DomainEvent) -> Result<(), sqlx::Error> {
        let input = CreateDomainEvent {
            event_id: event.event_id,
            event_type: event.event_type.clone(),
            entity_type: event.entity_type.clone(),
            entity_id: event.entity_id,
            previous_state: event.previous_state.clone(),
            new_state: event.new_state.clone(),
            actor: event.actor.clone(),
            payload: event.payload.clone(),
        };

        if DomainEventRepo::insert(pool, &input).await?.is_none() {
            tracing::debug!(
                event_id = %event.event_id,
                event_type = %event.event_type,
                "Duplicate event delivery skipped"
            );
        }
        Ok(())
    }
}
