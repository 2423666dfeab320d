//! Bearer token issuance and verification.
//!
//! Tokens are HS256-signed JWTs containing a [`Claims`] payload. The server
//! keeps no token state: a token is valid until its `exp` claim passes.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use proposer_core::error::AuthFailure;
use proposer_core::types::DbId;
use serde::{Deserialize, Serialize};

/// Default token lifetime in hours.
pub const DEFAULT_EXPIRY_HOURS: i64 = 24;

/// Longest accepted token lifetime (one year).
pub const MAX_EXPIRY_HOURS: i64 = 8760;

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    pub username: String,
    pub is_admin: bool,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Configuration for token generation and validation.
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in hours.
    pub expiry_hours: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiry_hours", &self.expiry_hours)
            .finish()
    }
}

impl JwtConfig {
    /// Token lifetime in seconds.
    pub fn expiry_secs(&self) -> i64 {
        self.expiry_hours.saturating_mul(3600)
    }
}

/// Issue an HS256 token for the given user.
///
/// Fails only when the signing key is unusable (an empty secret).
pub fn generate_token(
    user_id: DbId,
    username: &str,
    is_admin: bool,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    if config.secret.is_empty() {
        return Err(ErrorKind::InvalidKeyFormat.into());
    }

    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        is_admin,
        iat: now,
        exp: now.saturating_add(config.expiry_secs()),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify a token's signature and expiry, returning the embedded [`Claims`].
///
/// No leeway is applied: a token is expired the second `exp` passes.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, AuthFailure> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthFailure::TokenExpired,
        _ => AuthFailure::TokenInvalid,
    })
}
