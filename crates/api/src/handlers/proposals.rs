//! Handlers for the `/proposals` resource.

use axum::extract::{Path, State};
use axum::Json;
use proposer_core::error::CoreError;
use proposer_core::types::DbId;
use proposer_db::models::proposal::{CreateProposal, Proposal};
use proposer_db::repositories::ProposalRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreateProposalResponse {
    pub id: DbId,
}

/// POST /api/proposals
///
/// Store the request body verbatim, owned by the caller.
pub async fn create_proposal(
    State(state): State<AppState>,
    user: AuthUser,
    Json(data): Json<serde_json::Value>,
) -> AppResult<Json<CreateProposalResponse>> {
    let proposal = ProposalRepo::create(
        &state.pool,
        &CreateProposal {
            user_id: user.user_id,
            data,
        },
    )
    .await?;

    tracing::info!(proposal_id = proposal.id, user_id = user.user_id, "Proposal saved");
    Ok(Json(CreateProposalResponse { id: proposal.id }))
}

/// GET /api/proposals
pub async fn list_proposals(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<Proposal>>> {
    Ok(Json(ProposalRepo::list(&state.pool).await?))
}

/// GET /api/proposals/{id}
pub async fn get_proposal(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Proposal>> {
    let proposal = ProposalRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Proposal",
            id,
        }))?;
    Ok(Json(proposal))
}
