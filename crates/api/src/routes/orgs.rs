//! Route definitions for organizations and production lines.

use axum::routing::get;
use axum::Router;

use crate::handlers::orgs;
use crate::state::AppState;

/// Routes mounted at `/orgs`.
///
/// ```text
/// GET  /             -> list_orgs
/// POST /             -> create_org
/// GET  /{id}/lines   -> list_lines
/// POST /{id}/lines   -> create_line
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(orgs::list_orgs).post(orgs::create_org))
        .route(
            "/{id}/lines",
            get(orgs::list_lines).post(orgs::create_line),
        )
}
