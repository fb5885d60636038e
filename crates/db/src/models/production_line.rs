//! Production line model.

use leanline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `production_lines` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductionLine {
    pub id: DbId,
    pub org_id: DbId,
    pub name: String,
    pub status: String,
    pub output_per_hour: Option<i32>,
    pub created_at: Timestamp,
}

/// DTO for creating a line under an organization (the org comes from the path).
#[derive(Debug, Deserialize)]
pub struct CreateProductionLine {
    pub name: String,
    pub status: Option<String>,
    pub output_per_hour: Option<i32>,
}
