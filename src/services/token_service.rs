//! Signed session tokens (HS256 JWT).
//!
//! Tokens are stateless: nothing is stored server-side and there is no revocation.
//! Claims are a snapshot of the account at issue time.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Role, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, malformed token and expiry all collapse into this one.
    #[error("Invalid or expired token")]
    InvalidOrExpired,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: chrono::Duration,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &str, ttl_days: u32) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: chrono::Duration::days(i64::from(ttl_days)),
        }
    }

    #[must_use]
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        self.issue_at(user, chrono::Utc::now().timestamp())
    }

    pub(crate) fn issue_at(&self, user: &User, issued_at: i64) -> Result<String, TokenError> {
        let claims = Claims {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            iat: issued_at,
            exp: issued_at + self.ttl_seconds(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                TokenError::InvalidOrExpired
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "user-1".to_string(),
            email: "a@example.com".to_string(),
            name: "A".to_string(),
            role: Role::User,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = TokenService::new("secret", 7);
        let token = tokens.issue(&user()).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.id, "user-1");
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.name, "A");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = TokenService::new("secret", 7).issue(&user()).unwrap();
        let other = TokenService::new("other-secret", 7);

        assert!(matches!(
            other.verify(&token),
            Err(TokenError::InvalidOrExpired)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = TokenService::new("secret", 7);
        let eight_days_ago = chrono::Utc::now().timestamp() - 8 * 24 * 60 * 60;
        let token = tokens.issue_at(&user(), eight_days_ago).unwrap();

        assert!(matches!(
            tokens.verify(&token),
            Err(TokenError::InvalidOrExpired)
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let tokens = TokenService::new("secret", 7);
        for token in ["", "abc", "a.b.c", "fake-jwt-token-123"] {
            assert!(matches!(
                tokens.verify(token),
                Err(TokenError::InvalidOrExpired)
            ));
        }
    }

    #[test]
    fn test_tampered_role_is_rejected() {
        let tokens = TokenService::new("secret", 7);
        let token = tokens.issue(&user()).unwrap();

        let mut admin = user();
        admin.role = Role::Admin;
        let admin_token = tokens.issue(&admin).unwrap();

        // Splice the admin payload onto the user signature
        let parts: Vec<&str> = token.split('.').collect();
        let admin_parts: Vec<&str> = admin_token.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], admin_parts[1], parts[2]);

        assert!(tokens.verify(&forged).is_err());
    }
}
