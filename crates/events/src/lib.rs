//! Dealflow event bus and audit infrastructure.
//!
//! This crate provides the building blocks for the platform-wide event
//! system (PRD-04):
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DomainEvent`] -- the canonical state-transition event envelope.
//! - [`EventPersistence`] -- background service that durably writes every
//!   event to the `domain_events` table.

pub mod bus;
pub mod persistence;

pub use bus::{DomainEvent, EventBus};
pub use persistence::EventPersistence;
