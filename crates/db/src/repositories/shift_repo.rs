//! Repository for the `shifts` table.

use leanline_core::shift::normalize_shift_name;
use leanline_core::types::DbId;
use sqlx::PgPool;

use crate::models::shift::{CreateShift, Shift};

/// Column list for shifts queries.
const COLUMNS: &str = "id, org_id, line_id, shift_name, started_at, planned_time_min, \
    ideal_cycle_sec, output_units, scrap_units, created_at";

/// Provides insert and lookup for shift headers. Shifts are immutable once saved.
pub struct ShiftRepo;

impl ShiftRepo {
    /// Create a shift header, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateShift) -> Result<Shift, sqlx::Error> {
        let query = format!(
            "INSERT INTO shifts
                (org_id, line_id, shift_name, started_at, planned_time_min,
                 ideal_cycle_sec, output_units, scrap_units)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shift>(&query)
            .bind(input.org_id)
            .bind(input.line_id)
            .bind(normalize_shift_name(input.shift_name.as_deref()))
            .bind(input.started_at)
            .bind(input.inputs.planned_time_min)
            .bind(input.inputs.ideal_cycle_sec)
            .bind(input.inputs.output_units)
            .bind(input.inputs.scrap_units)
            .fetch_one(pool)
            .await
    }

    /// Find a shift by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Shift>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shifts WHERE id = $1");
        sqlx::query_as::<_, Shift>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The most recently started shift for an organization.
    pub async fn latest_for_org(
        pool: &PgPool,
        org_id: DbId,
    ) -> Result<Option<Shift>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shifts
             WHERE org_id = $1
             ORDER BY started_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Shift>(&query)
            .bind(org_id)
            .fetch_optional(pool)
            .await
    }
}
