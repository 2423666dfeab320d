//! Accounts: the stored row, its public view, and write inputs.

use proposer_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of `users`. Holds the password hash, so handlers answer with
/// [`UserResponse`] instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Account as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: Option<String>,
    pub is_admin: bool,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(row: User) -> Self {
        let User {
            id,
            username,
            email,
            is_admin,
            created_at,
            ..
        } = row;
        Self {
            id,
            username,
            email,
            is_admin,
            created_at,
        }
    }
}

/// Insert payload; `password_hash` is already an argon2 PHC string.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Partial update. `None` keeps the stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub is_admin: Option<bool>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        matches!(
            self,
            UpdateUser {
                username: None,
                email: None,
                password_hash: None,
                is_admin: None,
            }
        )
    }
}
