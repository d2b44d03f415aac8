//! Bearer credential validation.
//!
//! The dashboard issues HS256 tokens whose `sub` claim is the user id.
//! This service only verifies; it never mints tokens (tests excepted).

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Authorization header is not a Bearer token")]
    NotBearer,

    #[error("Invalid or expired token")]
    InvalidToken,
}

/// Registered claims this service cares about.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// The user the token was issued to.
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

/// Pulls the raw token out of the `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::NotBearer)?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::NotBearer)
}

/// Verifies signature and expiry, returning the claims.
pub fn verify(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken)
}

#[cfg(test)]
pub(crate) fn mint_token(sub: &str, secret: &str) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let claims = Claims {
        sub: sub.to_string(),
        iat: now,
        exp: now + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), Err(AuthError::MissingToken));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), Err(AuthError::NotBearer));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), Err(AuthError::NotBearer));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok123"));
        assert_eq!(bearer_token(&headers), Ok("tok123"));
    }

    #[test]
    fn test_verify_roundtrip() {
        let token = mint_token("user-1", "s3cret");
        let claims = verify(&token, "s3cret").unwrap();
        assert_eq!(claims.sub, "user-1");
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = mint_token("user-1", "s3cret");
        assert_eq!(verify(&token, "other"), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert_eq!(verify("not-a-jwt", "s3cret"), Err(AuthError::InvalidToken));
    }
}
