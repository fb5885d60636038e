//! Route definitions for action plans.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::actions;
use crate::state::AppState;

/// Routes mounted at `/actions`.
///
/// ```text
/// GET   /              -> list_actions (?org_id, line_id, status)
/// POST  /              -> create_action
/// PATCH /{id}/status   -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(actions::list_actions).post(actions::create_action),
        )
        .route("/{id}/status", patch(actions::update_status))
}
