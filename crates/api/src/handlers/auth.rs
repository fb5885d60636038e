//! Handlers for the `/auth` resource (login, logout, session).

use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use leanline_core::types::Timestamp;
use serde::{Deserialize, Serialize};

use crate::auth::session::{cleared_session_cookie, issue_session_token, session_cookie};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthSession;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
///
/// Missing fields deserialize as empty strings and fail the credential check.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub ok: bool,
    pub email: String,
    pub expires_at: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub email: String,
    pub expires_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Compare against the configured demo credentials and set the session cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    if !state.config.demo.matches(&input.email, &input.password) {
        tracing::warn!(email = %input.email, "Rejected login");
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let session = &state.config.session;
    let token = issue_session_token(&input.email, session)
        .map_err(|e| AppError::InternalError(format!("Session token error: {e}")))?;
    let expires_at = chrono::Utc::now() + chrono::Duration::hours(session.ttl_hours);

    tracing::info!(email = %input.email, "Session opened");

    Ok((
        jar.add(session_cookie(token, session)),
        Json(LoginResponse {
            ok: true,
            email: input.email,
            expires_at,
        }),
    ))
}

/// POST /api/auth/logout
///
/// Clear the session cookie. Succeeds whether or not a session was present.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    (jar.add(cleared_session_cookie()), Json(LogoutResponse { ok: true }))
}

/// GET /api/auth/session
///
/// Describe the current session.
pub async fn session(auth: AuthSession) -> Json<SessionResponse> {
    Json(SessionResponse {
        email: auth.email,
        expires_at: auth.expires_at,
    })
}
