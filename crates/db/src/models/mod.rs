//! Row models and request DTOs.

pub mod co_offer;
pub mod event;
pub mod offer;
pub mod opportunity;
pub mod party;
