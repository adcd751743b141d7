//! Dealflow approval engines.
//!
//! Orchestration layer between the pure state machines of `dealflow-core`
//! and the persistence layer of `dealflow-db`. Each mutating operation is
//! one transaction: lock the target row, compute the next state via core,
//! verify the actor against the resolved advisor relationships, write,
//! commit, then publish a [`DomainEvent`](dealflow_events::DomainEvent) on
//! the bus. The advisor inbox read composition lives here too.

pub mod co_offer;
pub mod error;
pub mod inbox;
pub mod offer;
pub mod opportunity;

pub use co_offer::{CoOfferActor, CoOfferEngine};
pub use error::{EngineError, EngineResult};
pub use inbox::{AdvisorInbox, AdvisorInboxView};
pub use offer::{OfferEngine, OfferParty};
pub use opportunity::{OpportunityActor, OpportunityEngine};
