//! Publish/subscribe hub for [`DomainEvent`]s.
//!
//! One `Arc<EventBus>` is created at startup and handed to every engine;
//! underneath it is a `tokio::sync::broadcast` channel, so publishing
//! never blocks and subscribers consume at their own pace.

use chrono::{DateTime, Utc};
use dealflow_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// DomainEvent
// ---------------------------------------------------------------------------

/// A state transition that occurred on the platform (PRD-04).
///
/// Every approval decision, stage advancement, and lifecycle change emits
/// one of these. Constructed via [`DomainEvent::new`] and enriched with
/// [`with_payload`](DomainEvent::with_payload). The `event_id` is assigned
/// at construction and is the deduplication key for persistence, so a
/// replayed delivery never produces a second audit row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique id for this emission; the persistence dedup key.
    pub event_id: Uuid,

    /// Dot-separated event name, e.g. `"offer.decided"`.
    pub event_type: String,

    /// Entity kind the event concerns (e.g. `"offer"`).
    pub entity_type: String,

    /// Database id of the entity.
    pub entity_id: DbId,

    /// State label before the transition, or `"none"` for creation events.
    pub previous_state: String,

    /// State label after the transition.
    pub new_state: String,

    /// Who triggered the transition, as `"role:id"` (e.g. `"startup:7"`)
    /// or `"system"` for automatic transitions.
    pub actor: String,

    /// Event-specific details as free-form JSON.
    pub payload: serde_json::Value,

    /// UTC time the transition was recorded.
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent {
    /// Create a new event describing one entity state transition.
    ///
    /// The payload defaults to an empty object.
    pub fn new(
        event_type: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: DbId,
        previous_state: impl Into<String>,
        new_state: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: event_type.into(),
            entity_type: entity_type.into(),
            entity_id,
            previous_state: previous_state.into(),
            new_state: new_state.into(),
            actor: actor.into(),
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Replace the default empty payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Broadcast buffer size; past this, the slowest subscriber starts losing
/// the oldest messages.
const DEFAULT_CAPACITY: usize = 1024;

/// Fan-out bus: every subscriber gets its own copy of every event
/// published after it subscribed.
///
/// # Usage
///
/// ```rust
/// use dealflow_events::bus::{DomainEvent, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(DomainEvent::new(
///     "offer.created",
///     "offer",
///     1,
///     "none",
///     "stage_1",
///     "investor:1",
/// ));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Bus with an explicit buffer capacity. A receiver that falls more
    /// than `capacity` events behind sees `RecvError::Lagged` and skips
    /// ahead.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Send one event to every live subscriber. With zero subscribers
    /// the event just evaporates; publishing is always fire-and-forget.
    pub fn publish(&self, event: DomainEvent) {
        // SendError here only signals an empty receiver set.
        let _ = self.sender.send(event);
    }

    /// Open a new subscription starting at the current position.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let event = DomainEvent::new(
            "offer.decided",
            "offer",
            42,
            "stage_1",
            "stage_2",
            "investor_advisor:7",
        )
        .with_payload(serde_json::json!({"decision": "approve"}));

        bus.publish(event);

        let received = rx.recv().await.expect("event should arrive");
        assert_eq!(received.event_type, "offer.decided");
        assert_eq!(received.entity_type, "offer");
        assert_eq!(received.entity_id, 42);
        assert_eq!(received.previous_state, "stage_1");
        assert_eq!(received.new_state, "stage_2");
        assert_eq!(received.actor, "investor_advisor:7");
        assert_eq!(received.payload["decision"], "approve");
    }

    #[tokio::test]
    async fn every_subscriber_gets_its_own_copy() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(DomainEvent::new(
            "opportunity.closed",
            "co_investment_opportunity",
            3,
            "active",
            "closed",
            "investor:9",
        ));

        let e1 = rx1.recv().await.expect("first subscriber should see it");
        let e2 = rx2.recv().await.expect("second subscriber should see it");

        assert_eq!(e1.event_type, "opportunity.closed");
        assert_eq!(e2.event_type, "opportunity.closed");
        assert_eq!(e1.event_id, e2.event_id);
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let bus = EventBus::default();
        bus.publish(DomainEvent::new(
            "offer.created",
            "offer",
            1,
            "none",
            "stage_1",
            "investor:1",
        ));
    }

    #[test]
    fn each_emission_gets_a_distinct_event_id() {
        let a = DomainEvent::new("offer.created", "offer", 1, "none", "stage_1", "investor:1");
        let b = DomainEvent::new("offer.created", "offer", 1, "none", "stage_1", "investor:1");
        assert_ne!(a.event_id, b.event_id);
    }

    #[test]
    fn default_event_has_empty_payload() {
        let event = DomainEvent::new("offer.created", "offer", 1, "none", "stage_1", "system");
        assert!(event.payload.is_object());
        assert_eq!(event.payload, serde_json::json!({}));
    }
}
