//! Authentication and authorization primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- bearer token issuance and verification.
//! - [`cookie`] -- the http-only cookie that can carry the bearer token.

pub mod cookie;
pub mod jwt;
pub mod password;
