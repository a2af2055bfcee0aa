//! HS256 bearer-token issuance and verification.
//!
//! The sign-in endpoint embeds the caller-supplied identity into a
//! signed, time-boxed token; every later request is authenticated
//! purely by verifying that token against the server secret.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Claims embedded in every bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Caller email — the identity consumed by all role checks.
    pub email: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Issue a signed HS256 token for the given identity.
pub fn issue_token(email: &str, config: &AuthConfig) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = IdentityClaims {
        email: email.to_string(),
        iat: now,
        exp: now + config.token_lifetime_secs as i64,
    };

    let key = EncodingKey::from_secret(config.token_secret.as_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("token encode: {e}")))
}

/// Verified identity claims — a newtype proving the token passed
/// signature and expiry checks.
#[derive(Debug, Clone)]
pub struct ValidatedIdentity(pub IdentityClaims);

impl ValidatedIdentity {
    pub fn email(&self) -> &str {
        &self.0.email
    }
}

/// Verify a bearer token (signature, expiry) and return the claims.
///
/// Entry point for request-level authentication. Purely stateless —
/// no database lookup is performed.
pub fn verify_token(token: &str, config: &AuthConfig) -> Result<ValidatedIdentity, AuthError> {
    let key = DecodingKey::from_secret(config.token_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp"]);

    jsonwebtoken::decode::<IdentityClaims>(token, &key, &validation)
        .map(|data| ValidatedIdentity(data.claims))
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}
