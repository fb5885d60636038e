//! Repository for the `production_lines` table.

use leanline_core::org::DEFAULT_LINE_STATUS;
use leanline_core::types::DbId;
use sqlx::PgPool;

use crate::models::production_line::{CreateProductionLine, ProductionLine};

/// Column list for production_lines queries.
const COLUMNS: &str = "id, org_id, name, status, output_per_hour, created_at";

/// Provides CRUD operations for production lines.
pub struct ProductionLineRepo;

impl ProductionLineRepo {
    /// Create a line under an organization, returning the created row.
    pub async fn create(
        pool: &PgPool,
        org_id: DbId,
        input: &CreateProductionLine,
    ) -> Result<ProductionLine, sqlx::Error> {
        let status = input.status.as_deref().unwrap_or(DEFAULT_LINE_STATUS);
        let query = format!(
            "INSERT INTO production_lines (org_id, name, status, output_per_hour)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductionLine>(&query)
            .bind(org_id)
            .bind(input.name.trim())
            .bind(status)
            .bind(input.output_per_hour)
            .fetch_one(pool)
            .await
    }

    /// Find a line by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProductionLine>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM production_lines WHERE id = $1");
        sqlx::query_as::<_, ProductionLine>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List lines belonging to an organization.
    pub async fn list_by_org(
        pool: &PgPool,
        org_id: DbId,
    ) -> Result<Vec<ProductionLine>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM production_lines WHERE org_id = $1 ORDER BY name, id"
        );
        sqlx::query_as::<_, ProductionLine>(&query)
            .bind(org_id)
            .fetch_all(pool)
            .await
    }
}
