//! Session-cookie authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use chrono::DateTime;
use leanline_core::types::Timestamp;

use crate::auth::session::{validate_session_token, SESSION_COOKIE};
use crate::error::AppError;
use crate::state::AppState;

/// The logged-in demo session, read from the `session` cookie.
///
/// Add it as a handler parameter to require authentication:
///
/// ```ignore
/// async fn my_handler(session: AuthSession) -> AppResult<Json<()>> {
///     tracing::info!(email = %session.email, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Email the session was opened with.
    pub email: String,
    pub expires_at: Timestamp,
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::unauthorized("Unauthorized"))?;

        let claims = validate_session_token(&token, &state.config.session)
            .map_err(|_| AppError::unauthorized("Invalid or expired session"))?;

        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AppError::unauthorized("Invalid or expired session"))?;

        Ok(AuthSession {
            email: claims.sub,
            expires_at,
        })
    }
}
