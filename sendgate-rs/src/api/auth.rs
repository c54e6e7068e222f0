//! JWT Authentication for REST API

use crate::error::{GateError, Result};
use axum::http::HeaderMap;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Admin flag; tokens minted before the flag existed decode as non-admin
    #[serde(default)]
    pub admin: bool,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at (Unix timestamp)
    pub iat: u64,
}

/// JWT configuration
pub struct JwtConfig {
    /// Secret key for signing tokens
    secret: String,
    /// Token expiration duration
    expiration: Duration,
}

impl JwtConfig {
    /// Create a new JWT configuration
    pub fn new(secret: String, expiration_hours: u64) -> Self {
        Self {
            secret,
            expiration: Duration::from_secs(expiration_hours * 3600),
        }
    }

    /// Create a new JWT token for a user
    pub fn create_token(
        &self,
        user_id: &str,
        admin: bool,
    ) -> std::result::Result<String, jsonwebtoken::errors::Error> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        let claims = Claims {
            sub: user_id.to_string(),
            admin,
            exp: now + self.expiration.as_secs(),
            iat: now,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Validate a JWT token and extract claims.
    ///
    /// Every decode failure (bad signature, expired, malformed) collapses
    /// into `Unauthenticated` so callers branch on the error kind, never
    /// on jsonwebtoken's message text.
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| GateError::Unauthenticated)?;

        if token_data.claims.sub.is_empty() {
            return Err(GateError::Unauthenticated);
        }

        Ok(token_data.claims)
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::new("change-me-in-production".to_string(), 24)
    }
}

/// Extract the bearer token from an Authorization header, if present
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_create_and_validate_token() {
        let config = JwtConfig::new("test-secret".to_string(), 1);

        let token = config.create_token("user-42", false).unwrap();
        assert!(!token.is_empty());

        let claims = config.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user-42");
        assert!(!claims.admin);
    }

    #[test]
    fn test_admin_flag_round_trips() {
        let config = JwtConfig::new("test-secret".to_string(), 1);

        let token = config.create_token("ops", true).unwrap();
        let claims = config.validate_token(&token).unwrap();
        assert!(claims.admin);
    }

    #[test]
    fn test_invalid_token_is_unauthenticated() {
        let config = JwtConfig::new("test-secret".to_string(), 1);

        let result = config.validate_token("invalid-token");
        assert!(matches!(result, Err(GateError::Unauthenticated)));
    }

    #[test]
    fn test_wrong_secret_is_unauthenticated() {
        let config = JwtConfig::new("test-secret".to_string(), 1);
        let other = JwtConfig::new("other-secret".to_string(), 1);

        let token = config.create_token("user-42", false).unwrap();
        let result = other.validate_token(&token);
        assert!(matches!(result, Err(GateError::Unauthenticated)));
    }

    #[test]
    fn test_empty_subject_rejected() {
        let config = JwtConfig::new("test-secret".to_string(), 1);

        let token = config.create_token("", false).unwrap();
        let result = config.validate_token(&token);
        assert!(matches!(result, Err(GateError::Unauthenticated)));
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert("authorization", HeaderValue::from_static("Basic dXNlcg=="));
        assert!(bearer_token(&headers).is_none());
    }
}
