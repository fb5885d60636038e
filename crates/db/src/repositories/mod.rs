//! PostgreSQL repositories, one per table.
//!
//! Each repository is a zero-sized struct with associated async functions
//! taking the pool explicitly. [`crate::store::PgStore`] delegates to them.

pub mod action_plan_repo;
pub mod event_repo;
pub mod organization_repo;
pub mod production_line_repo;
pub mod shift_repo;

pub use action_plan_repo::ActionPlanRepo;
pub use event_repo::EventRepo;
pub use organization_repo::OrganizationRepo;
pub use production_line_repo::ProductionLineRepo;
pub use shift_repo::ShiftRepo;
