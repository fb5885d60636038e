//! Route definitions for the AI endpoints.

use axum::routing::post;
use axum::Router;

use crate::handlers::ai;
use crate::state::AppState;

/// Routes mounted at `/ai` (under `/api`, and at the root for `/ai/analyze`).
///
/// ```text
/// POST /analyze          -> analyze
/// POST /recommendations  -> recommendations
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(ai::analyze))
        .route("/recommendations", post(ai::recommendations))
}

/// The root-level alias, `/ai/analyze` only.
pub fn legacy_router() -> Router<AppState> {
    Router::new().route("/ai/analyze", post(ai::analyze))
}
