//! Handlers for login, logout, and session checks.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use proposer_core::error::{AuthFailure, CoreError};
use proposer_db::models::user::UserResponse;
use proposer_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::cookie::{removal_cookie, token_cookie};
use crate::auth::jwt::generate_token;
use crate::auth::password::verify_password_blocking;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Response for `GET /check-auth`.
#[derive(Debug, Serialize)]
pub struct CheckAuthResponse {
    pub authenticated: bool,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/login
///
/// Exchange username + password for a token. The token is returned in the
/// body and also set as the http-only `token` cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let (Some(username), Some(password)) = (
        input.username.filter(|u| !u.is_empty()),
        input.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::Core(CoreError::Validation(
            "Username and password are required".into(),
        )));
    };

    let invalid = || AppError::Core(CoreError::Unauthorized(AuthFailure::InvalidCredentials));

    let Some(user) = UserRepo::find_by_username(&state.pool, &username).await? else {
        tracing::info!("Login rejected: unknown user");
        return Err(invalid());
    };

    let password_valid = verify_password_blocking(password, user.password_hash.clone())
        .await
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid());
    }

    let token = generate_token(user.id, &user.username, user.is_admin, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, is_admin = user.is_admin, "User logged in");

    let secure = state.config.environment.is_production();
    let jar = jar.add(token_cookie(token.clone(), secure));

    Ok((
        jar,
        Json(LoginResponse {
            token,
            expires_in: state.config.jwt.expiry_secs(),
            user: UserResponse::from(user),
        }),
    ))
}

/// POST /api/logout
///
/// Clear the token cookie. Tokens are stateless, so a copy held elsewhere
/// stays valid until it expires.
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (jar.add(removal_cookie()), StatusCode::NO_CONTENT)
}

/// GET /api/check-auth
///
/// Confirm the caller's token and return their current account. A token
/// whose user has since been deleted is rejected as invalid.
pub async fn check_auth(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<CheckAuthResponse>> {
    let current = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::Unauthorized(
            AuthFailure::TokenInvalid,
        )))?;

    Ok(Json(CheckAuthResponse {
        authenticated: true,
        user: UserResponse::from(current),
    }))
}
