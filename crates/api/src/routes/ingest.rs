//! Route definitions for the ingest form.

use axum::routing::get;
use axum::Router;

use crate::handlers::ingest;
use crate::state::AppState;

/// Routes mounted at `/ingest`.
///
/// ```text
/// GET  /events     -> list_events (?shift_id, line_id, event_type, from, to, limit, offset)
/// POST /events     -> create_event
/// GET  /categories -> list_categories
/// GET  /shift      -> latest_shift (?org_id)
/// POST /shift      -> create_shift
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/events",
            get(ingest::list_events).post(ingest::create_event),
        )
        .route("/categories", get(ingest::list_categories))
        .route(
            "/shift",
            get(ingest::latest_shift).post(ingest::create_shift),
        )
}
