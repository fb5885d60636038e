//! Route definitions for shift lookups.

use axum::routing::get;
use axum::Router;

use crate::handlers::shifts;
use crate::state::AppState;

/// Routes mounted at `/shifts`.
///
/// ```text
/// GET /active          -> active_shift (?org_id)
/// GET /{id}/analysis   -> shift_analysis
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/active", get(shifts::active_shift))
        .route("/{id}/analysis", get(shifts::shift_analysis))
}
