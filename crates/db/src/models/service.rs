//! Service catalog entity model and DTOs.

use proposer_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `services` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Service {
    pub id: DbId,
    pub name: String,
    pub title: String,
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a single service.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateService {
    pub name: String,
    pub title: String,
    pub display_order: i32,
}

/// One entry of a bulk replace. Entries without an `id` are inserted;
/// entries with an `id` overwrite that row (or create it with that id).
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertService {
    pub id: Option<DbId>,
    pub name: String,
    pub title: String,
    pub display_order: i32,
}
