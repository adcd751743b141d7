//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept the executor as the first argument. Methods taking
//! `&mut PgConnection` are meant to run inside an engine-owned transaction
//! and pair a `FOR UPDATE` read with the write it guards.

pub mod advisor_repo;
pub mod co_offer_repo;
pub mod event_repo;
pub mod investor_repo;
pub mod offer_repo;
pub mod opportunity_repo;
pub mod startup_repo;

pub use advisor_repo::AdvisorRepo;
pub use co_offer_repo::CoOfferRepo;
pub use event_repo::DomainEventRepo;
pub use investor_repo::InvestorRepo;
pub use offer_repo::OfferRepo;
pub use opportunity_repo::OpportunityRepo;
pub use startup_repo::StartupRepo;
