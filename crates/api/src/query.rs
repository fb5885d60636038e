//! Shared query parameter types for API handlers.

use leanline_core::types::DbId;
use serde::Deserialize;

/// `?org_id=` selector used by the shift lookups.
///
/// Optional at the type level so a missing value is reported as a 400 with
/// a readable message instead of an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct OrgParams {
    pub org_id: Option<DbId>,
}

impl OrgParams {
    pub fn require(&self) -> Result<DbId, String> {
        self.org_id
            .ok_or_else(|| "org_id query param required".to_string())
    }
}

/// Filters for `GET /api/actions`.
///
/// `status` is a comma-separated list; absent means open + delayed.
#[derive(Debug, Deserialize)]
pub struct ActionListParams {
    pub org_id: Option<DbId>,
    pub line_id: Option<DbId>,
    pub status: Option<String>,
}
