//! Repository for the append-only `form_structures` table.

use proposer_core::types::DbId;
use sqlx::PgPool;

use crate::models::form_structure::{FormStructureSummary, FormStructureVersion};

const COLUMNS: &str = "id, structure, created_at, updated_at";

/// Newest first; `id` breaks ties between rows inserted in the same instant.
const NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

/// Provides append and read operations for form structure versions.
///
/// Rows are only ever inserted; earlier layouts stay readable by id.
pub struct FormStructureRepo;

impl FormStructureRepo {
    /// Append a new version, returning the stored row.
    pub async fn insert(
        pool: &PgPool,
        structure: &serde_json::Value,
    ) -> Result<FormStructureVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO form_structures (structure) VALUES ($1) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FormStructureVersion>(&query)
            .bind(structure)
            .fetch_one(pool)
            .await
    }

    /// The most recently created version, if any.
    pub async fn find_current(pool: &PgPool) -> Result<Option<FormStructureVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM form_structures {NEWEST_FIRST} LIMIT 1");
        sqlx::query_as::<_, FormStructureVersion>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Find a specific version by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FormStructureVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM form_structures WHERE id = $1");
        sqlx::query_as::<_, FormStructureVersion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every version (without documents), newest first.
    pub async fn list_versions(pool: &PgPool) -> Result<Vec<FormStructureSummary>, sqlx::Error> {
        let query = format!("SELECT id, created_at FROM form_structures {NEWEST_FIRST}");
        sqlx::query_as::<_, FormStructureSummary>(&query)
            .fetch_all(pool)
            .await
    }

    /// Number of stored versions.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM form_structures")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
