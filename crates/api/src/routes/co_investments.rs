//! Route definitions for the co-investment pipeline (PRD-15).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::co_investments;
use crate::state::AppState;

/// Co-investment routes, nested under `/co-investments`.
///
/// ```text
/// POST   /opportunities                   create_opportunity
/// GET    /opportunities/{id}              get_opportunity
/// POST   /opportunities/{id}/decide       decide_opportunity
/// POST   /opportunities/{id}/close        close_opportunity
/// GET    /opportunities/{id}/offers       list_opportunity_offers
/// POST   /offers                          create_co_offer
/// POST   /offers/{id}/decide              decide_co_offer
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/opportunities", post(co_investments::create_opportunity))
        .route("/opportunities/{id}", get(co_investments::get_opportunity))
        .route(
            "/opportunities/{id}/decide",
            post(co_investments::decide_opportunity),
        )
        .route(
            "/opportunities/{id}/close",
            post(co_investments::close_opportunity),
        )
        .route(
            "/opportunities/{id}/offers",
            get(co_investments::list_opportunity_offers),
        )
        .route("/offers", post(co_investments::create_co_offer))
        .route("/offers/{id}/decide", post(co_investments::decide_co_offer))
}
