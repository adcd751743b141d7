//! Route definitions for the regular offer pipeline (PRD-12).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::offers;
use crate::state::AppState;

/// Offer routes, nested under `/offers`.
///
/// ```text
/// POST   /                        create_offer
/// GET    /{id}                    get_offer
/// GET    /{id}/events             list_offer_events
/// POST   /{id}/decide             decide_offer
/// POST   /{id}/accept             accept_offer
/// POST   /{id}/fast-forward       fast_forward_offer
/// POST   /{id}/reveal-contact     reveal_offer_contact
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(offers::create_offer))
        .route("/{id}", get(offers::get_offer))
        .route("/{id}/events", get(offers::list_offer_events))
        .route("/{id}/decide", post(offers::decide_offer))
        .route("/{id}/accept", post(offers::accept_offer))
        .route("/{id}/fast-forward", post(offers::fast_forward_offer))
        .route("/{id}/reveal-contact", post(offers::reveal_offer_contact))
}
