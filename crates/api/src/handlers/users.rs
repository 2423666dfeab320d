//! Handlers for the `/users` resource.
//!
//! Everything except the self-service profile update requires an
//! administrator via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use proposer_core::accounts::{
    ensure_deletable, ensure_editable, plan_profile_update, validate_email,
    validate_password_strength, validate_username,
};
use proposer_core::error::CoreError;
use proposer_core::types::DbId;
use proposer_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use proposer_db::repositories::user_repo::{UQ_EMAIL, UQ_USERNAME};
use proposer_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Request body for `PUT /users/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

/// Request body for `PUT /users/profile`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// `{ "user": ... }` envelope.
#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

/// Response for `PUT /users/profile`.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: &'static str,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

/// Turn a username/email uniqueness clash into a 409 with a readable message.
fn map_identity_conflict(err: sqlx::Error) -> AppError {
    if proposer_db::is_unique_violation(&err, UQ_USERNAME) {
        return AppError::Core(CoreError::Conflict("Username already exists".into()));
    }
    if proposer_db::is_unique_violation(&err, UQ_EMAIL) {
        return AppError::Core(CoreError::Conflict("Email is already in use".into()));
    }
    AppError::Database(err)
}

async fn hash(state: &AppState, password: String) -> AppResult<String> {
    hash_password_blocking(password, state.config.password)
        .await
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/users
///
/// All accounts, newest first.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/users
///
/// Create an account. Username, email, and password are required.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserEnvelope>)> {
    let (Some(username), Some(email), Some(password)) = (
        input.username.filter(|s| !s.is_empty()),
        input.email.filter(|s| !s.is_empty()),
        input.password.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::Core(CoreError::Validation(
            "Username, password, and email are required".into(),
        )));
    };

    validate_username(&username)?;
    validate_email(&email)?;
    validate_password_strength(&password)?;

    let password_hash = hash(&state, password).await?;
    let create = CreateUser {
        username,
        email: Some(email),
        password_hash,
        is_admin: input.is_admin,
    };
    let user = UserRepo::create(&state.pool, &create)
        .await
        .map_err(map_identity_conflict)?;

    tracing::info!(
        user_id = user.id,
        is_admin = user.is_admin,
        created_by = admin.user_id,
        "User created"
    );

    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            user: UserResponse::from(user),
        }),
    ))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserEnvelope>> {
    let user = load_user(&state, id).await?;
    Ok(Json(UserEnvelope {
        user: UserResponse::from(user),
    }))
}

/// PUT /api/users/{id}
///
/// Change any of username, email, password, or admin flag. The reserved
/// `admin` account cannot be renamed or demoted.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<UserEnvelope>> {
    let target = load_user(&state, id).await?;
    ensure_editable(&target.username, input.username.as_deref(), input.is_admin)?;

    if let Some(username) = &input.username {
        validate_username(username)?;
    }
    if let Some(email) = &input.email {
        validate_email(email)?;
    }
    let password_hash = match input.password {
        Some(password) => {
            validate_password_strength(&password)?;
            Some(hash(&state, password).await?)
        }
        None => None,
    };

    let update = UpdateUser {
        username: input.username,
        email: input.email,
        password_hash,
        is_admin: input.is_admin,
    };
    if update.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "No changes to update".into(),
        )));
    }

    let user = UserRepo::update(&state.pool, id, &update)
        .await
        .map_err(map_identity_conflict)?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(user_id = id, updated_by = admin.user_id, "User updated");

    Ok(Json(UserEnvelope {
        user: UserResponse::from(user),
    }))
}

/// DELETE /api/users/{id}
///
/// Fails with 403 for the reserved `admin` account and 409 while the user
/// still owns proposals.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let target = load_user(&state, id).await?;
    ensure_deletable(&target.username)?;

    if !UserRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }

    tracing::info!(user_id = id, deleted_by = admin.user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/users/profile
///
/// Self-service update of the caller's email and/or password. The current
/// password must be supplied and correct.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let current_password = input
        .current_password
        .filter(|p| !p.is_empty())
        .ok_or(AppError::Core(CoreError::Validation(
            "Current password is required".into(),
        )))?;

    let user = load_user(&state, auth.user_id).await?;

    let password_valid = verify_password_blocking(current_password, user.password_hash.clone())
        .await
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Validation(
            "Current password is incorrect".into(),
        )));
    }

    let changes = plan_profile_update(
        user.email.as_deref(),
        input.email.as_deref(),
        input.new_password.as_deref(),
    )?;

    if let Some(email) = &changes.email {
        if UserRepo::email_in_use(&state.pool, email, user.id).await? {
            return Err(AppError::Core(CoreError::Conflict(
                "Email is already in use".into(),
            )));
        }
    }

    let password_hash = match changes.new_password {
        Some(password) => Some(hash(&state, password).await?),
        None => None,
    };

    let update = UpdateUser {
        email: changes.email,
        password_hash,
        ..UpdateUser::default()
    };
    let updated = UserRepo::update(&state.pool, user.id, &update)
        .await
        .map_err(map_identity_conflict)?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.id,
        }))?;

    tracing::info!(user_id = user.id, "Profile updated");

    Ok(Json(ProfileResponse {
        message: "Profile updated successfully",
        user: UserResponse::from(updated),
    }))
}
