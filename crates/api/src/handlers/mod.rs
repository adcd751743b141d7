//! Request handlers for the dealflow pipelines.
//!
//! Each submodule provides async handler functions for one surface: regular
//! offers, co-investment listings and offers, and the advisor inbox. Handlers
//! delegate to the engines in `dealflow_engine` and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod advisors;
pub mod co_investments;
pub mod offers;
