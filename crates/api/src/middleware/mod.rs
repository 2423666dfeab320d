//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a bearer token.
//! - [`rbac::RequireAdmin`] -- Requires an administrator.

pub mod auth;
pub mod rbac;
