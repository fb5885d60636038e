//! Domain logic for the Leanline production dashboard.
//!
//! Everything here is pure: no I/O, no clocks beyond what callers pass in.
//! Persistence lives in `leanline-db`; HTTP in `leanline-api`.

pub mod action_plan;
pub mod ai;
pub mod error;
pub mod event;
pub mod findings;
pub mod metrics;
pub mod org;
pub mod paging;
pub mod shift;
pub mod types;
