pub mod actions;
pub mod ai;
pub mod auth;
pub mod ingest;
pub mod orgs;
pub mod shifts;
