//! Repository for the append-only `proposals` table.

use proposer_core::types::DbId;
use sqlx::PgPool;

use crate::models::proposal::{CreateProposal, Proposal};

const COLUMNS: &str = "id, user_id, data, created_at, updated_at";

/// Provides insert and read operations for proposal submissions.
pub struct ProposalRepo;

impl ProposalRepo {
    /// Record a submission, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProposal) -> Result<Proposal, sqlx::Error> {
        let query = format!(
            "INSERT INTO proposals (user_id, data) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(input.user_id)
            .bind(&input.data)
            .fetch_one(pool)
            .await
    }

    /// Find a submission by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM proposals WHERE id = $1");
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all submissions, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Proposal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM proposals ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Proposal>(&query).fetch_all(pool).await
    }
}
