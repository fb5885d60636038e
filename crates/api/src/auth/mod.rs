//! Authentication primitives.
//!
//! - [`session`] -- signed session tokens carried in the `session` cookie.

pub mod session;
