pub mod actions;
pub mod ai;
pub mod auth;
pub mod health;
pub mod ingest;
pub mod orgs;
pub mod shifts;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
/// /auth/logout                         logout (public)
/// /auth/session                        current session
///
/// /ai/analyze                          prompt proxy (POST)
/// /ai/recommendations                  shift-grounded actions (POST)
///
/// /ingest/events                       list, record
/// /ingest/shift                        latest for org, record
///
/// /shifts/active                       latest shift for org (?org_id)
/// /shifts/{id}/analysis                metrics + findings
///
/// /actions                             list, create
/// /actions/{id}/status                 change status (PATCH)
///
/// /orgs                                list, create
/// /orgs/{id}/lines                     list, create
/// ```
///
/// Everything except login and logout requires the `session` cookie.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/ai", ai::router())
        .nest("/ingest", ingest::router())
        .nest("/shifts", shifts::router())
        .nest("/actions", actions::router())
        .nest("/orgs", orgs::router())
}
