//! Dealflow domain core.
//!
//! Pure domain model for the investment-offer approval pipelines: shared
//! identifier types, the error taxonomy, advisor-relationship matching, and
//! the three state machines (regular offers, co-investment offers,
//! co-investment opportunities). No I/O happens here; persistence and
//! orchestration live in `dealflow-db` and `dealflow-engine`.

pub mod advisor;
pub mod co_offer;
pub mod error;
pub mod gate;
pub mod offer;
pub mod opportunity;
pub mod types;

pub use error::CoreError;
