//! Proposal submission model and DTO.

use proposer_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A submitted proposal. Rows are never updated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Proposal {
    pub id: DbId,
    pub user_id: DbId,
    pub data: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a submission.
#[derive(Debug, Deserialize)]
pub struct CreateProposal {
    pub user_id: DbId,
    pub data: serde_json::Value,
}
