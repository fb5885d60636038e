//! Request extractors shared by the handlers.
//!
//! - [`auth::AuthSession`] -- requires a valid `session` cookie.

pub mod auth;
