use std::sync::Arc;

use dealflow_engine::{AdvisorInbox, CoOfferEngine, OfferEngine, OpportunityEngine};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: dealflow_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Centralized event bus for publishing domain events.
    pub event_bus: Arc<dealflow_events::EventBus>,
    /// Regular offer transitions.
    pub offers: Arc<OfferEngine>,
    /// Co-investment offer transitions.
    pub co_offers: Arc<CoOfferEngine>,
    /// Co-investment opportunity transitions and capacity reads.
    pub opportunities: Arc<OpportunityEngine>,
    /// Advisor-facing read model.
    pub inbox: Arc<AdvisorInbox>,
}

impl AppState {
    /// Wire the engines onto a pool and bus.
    pub fn new(
        pool: dealflow_db::DbPool,
        config: Arc<ServerConfig>,
        event_bus: Arc<dealflow_events::EventBus>,
    ) -> Self {
        let offers = Arc::new(OfferEngine::new(pool.clone(), Arc::clone(&event_bus)));
        let co_offers = Arc::new(CoOfferEngine::new(pool.clone(), Arc::clone(&event_bus)));
        let opportunities = Arc::new(OpportunityEngine::new(
            pool.clone(),
            Arc::clone(&event_bus),
        ));
        let inbox = Arc::new(AdvisorInbox::new(pool.clone()));

        Self {
            pool,
            config,
            event_bus,
            offers,
            co_offers,
            opportunities,
            inbox,
        }
    }
}
