//! Request extractors whose rejections are [`AppError`]s.
//!
//! Malformed JSON, a missing field, a missing `Content-Type`, a bad query
//! string or a non-numeric path id becomes a 400 with the usual
//! `{error, code}` body instead of axum's plain-text 400/415/422 responses.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
