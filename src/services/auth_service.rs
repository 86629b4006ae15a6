//! Domain service for accounts and sessions.
//!
//! Handles admin bootstrap, registration, login, profile updates and role changes.

use serde::Serialize;
use thiserror::Error;

use crate::models::{Role, User};
use crate::services::token_service::{Claims, TokenError};
use crate::store::StoreError;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailTaken,

    #[error("An admin account already exists")]
    AdminExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmailTaken => Self::EmailTaken,
            StoreError::AdminExists => Self::AdminExists,
            StoreError::Internal(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidOrExpired => Self::InvalidToken,
            TokenError::Signing(msg) => Self::Internal(msg),
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Login result containing a fresh token and the account.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: User,
}

/// Profile update result. `access_token` is present only when tokens are re-issued.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    async fn has_admin(&self) -> bool;

    /// Creates the first admin account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AdminExists`] if any account already holds the admin role.
    async fn init_admin(&self, email: &str, password: &str, name: &str)
    -> Result<User, AuthError>;

    /// Registers a regular user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailTaken`] if the email is already registered.
    async fn register(&self, email: &str, password: &str, name: &str) -> Result<User, AuthError>;

    /// Verifies credentials and issues a session token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Verifies a bearer token and returns its claims.
    fn verify_token(&self, token: &str) -> Result<Claims, AuthError>;

    /// Renames the caller's account.
    async fn update_profile(&self, claims: &Claims, name: &str)
    -> Result<ProfileUpdate, AuthError>;

    async fn list_users(&self) -> Vec<User>;

    /// Changes an account's role. Already-issued tokens keep their old role.
    async fn set_role(&self, user_id: &str, role: Role) -> Result<User, AuthError>;
}
