//! Administrator guard for the user-management, form-structure, service
//! catalog and template routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use proposer_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An [`AuthUser`] whose token carries the admin flag.
///
/// The flag comes from the token claims, so a demotion only bites once the
/// user's current token expires.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl RequireAdmin {
    fn check(user: AuthUser) -> Result<Self, AppError> {
        if user.is_admin {
            Ok(Self(user))
        } else {
            Err(AppError::Core(CoreError::Forbidden(
                "Admin access required".into(),
            )))
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Self::check(user)
    }
}
