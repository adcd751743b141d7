pub mod advisors;
pub mod co_investments;
pub mod health;
pub mod offers;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /offers                                        create (POST)
/// /offers/{id}                                   detail (GET)
/// /offers/{id}/events                            audit trail (GET)
/// /offers/{id}/decide                            advisor decision (POST)
/// /offers/{id}/accept                            startup accepts (POST)
/// /offers/{id}/fast-forward                      manual override (POST)
/// /offers/{id}/reveal-contact                    idempotent reveal (POST)
///
/// /co-investments/opportunities                  create listing (POST)
/// /co-investments/opportunities/{id}             detail + capacity (GET)
/// /co-investments/opportunities/{id}/decide      gate/startup decision (POST)
/// /co-investments/opportunities/{id}/close       lead withdraws (POST)
/// /co-investments/opportunities/{id}/offers      offers on a listing (GET)
/// /co-investments/offers                         join a listing (POST)
/// /co-investments/offers/{id}/decide             chain decision (POST)
///
/// /advisors/{id}/inbox                           aggregated advisor view (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Regular investment offers.
        .nest("/offers", offers::router())
        // Co-investment opportunities and the offers joining them.
        .nest("/co-investments", co_investments::router())
        // Advisor-facing aggregated views.
        .nest("/advisors", advisors::router())
}
