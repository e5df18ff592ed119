//! Session tokens.
//!
//! Tokens are HS256 JWTs carrying the user's identity and roles. They have no
//! expiry: a token stays valid until its stored digest is deleted at logout.
//! Only the SHA-256 digest of a token is ever persisted.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{RoleAssignment, UserProfile};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: i32,
    pub name: String,
    pub email: String,
    pub roles: Vec<RoleAssignment>,
    pub iat: i64,
    /// Random per-login id so repeated logins yield distinct tokens
    pub jti: String,
}

impl SessionClaims {
    pub fn for_user(user: &UserProfile) -> Self {
        Self {
            sub: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            roles: user.roles.clone(),
            iat: jiff::Timestamp::now().as_second(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// Signs the claims into a bearer token.
pub fn issue_token(claims: &SessionClaims, secret: &str) -> AppResult<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to sign session token: {e}"),
    })
}

/// Verifies the signature and decodes the claims.
pub fn decode_token(token: &str, secret: &str) -> AppResult<SessionClaims> {
    let mut validation = Validation::default();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("unauthorized"))
}

/// Hex-encoded SHA-256 digest used as the stored session key.
pub fn token_signature(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
