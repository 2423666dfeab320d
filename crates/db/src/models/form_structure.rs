//! Form structure version model.

use proposer_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// One stored form layout. Rows are never updated or deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormStructureVersion {
    pub id: DbId,
    pub structure: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Version listing entry without the (potentially large) document.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormStructureSummary {
    pub id: DbId,
    pub created_at: Timestamp,
}
