//! In-memory implementation of the `AuthService` trait.

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{Role, User};
use crate::services::auth_service::{AuthError, AuthService, LoginResult, ProfileUpdate};
use crate::services::token_service::{Claims, TokenService};
use crate::store::{NewUser, Store};

pub struct MemoryAuthService {
    store: Store,
    tokens: Arc<TokenService>,
    reissue_on_profile_update: bool,
}

impl MemoryAuthService {
    #[must_use]
    pub const fn new(
        store: Store,
        tokens: Arc<TokenService>,
        reissue_on_profile_update: bool,
    ) -> Self {
        Self {
            store,
            tokens,
            reissue_on_profile_update,
        }
    }

    fn new_user(email: &str, password: &str, name: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl AuthService for MemoryAuthService {
    async fn has_admin(&self) -> bool {
        self.store.users().has_admin().await
    }

    async fn init_admin(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, AuthError> {
        let user = self
            .store
            .users()
            .init_admin(Self::new_user(email, password, name))
            .await?;

        tracing::info!(user_id = %user.id, "Admin account created");
        Ok(user)
    }

    async fn register(&self, email: &str, password: &str, name: &str) -> Result<User, AuthError> {
        let user = self
            .store
            .users()
            .register(Self::new_user(email, password, name))
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        let Some(user) = self.store.users().authenticate(email, password).await? else {
            tracing::warn!("Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        };

        let access_token = self.tokens.issue(&user)?;

        Ok(LoginResult {
            access_token,
            token_type: "Bearer",
            expires_in: self.tokens.ttl_seconds(),
            user,
        })
    }

    fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        Ok(self.tokens.verify(token)?)
    }

    async fn update_profile(
        &self,
        claims: &Claims,
        name: &str,
    ) -> Result<ProfileUpdate, AuthError> {
        let user = self
            .store
            .users()
            .update_name(&claims.id, name)
            .await
            .ok_or(AuthError::UserNotFound)?;

        let access_token = if self.reissue_on_profile_update {
            Some(self.tokens.issue(&user)?)
        } else {
            None
        };

        Ok(ProfileUpdate { user, access_token })
    }

    async fn list_users(&self) -> Vec<User> {
        self.store.users().list().await
    }

    async fn set_role(&self, user_id: &str, role: Role) -> Result<User, AuthError> {
        let user = self
            .store
            .users()
            .set_role(user_id, role)
            .await
            .ok_or(AuthError::UserNotFound)?;

        tracing::info!(user_id = %user.id, role = %role, "Role changed");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecurityConfig;

    fn service(reissue: bool) -> MemoryAuthService {
        let security = SecurityConfig {
            argon2_memory_cost_kib: 256,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        };
        MemoryAuthService::new(
            Store::new(security),
            Arc::new(TokenService::new("test-secret", 7)),
            reissue,
        )
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let auth = service(true);
        auth.register("a@example.com", "pw", "A").await.unwrap();

        let login = auth.login("a@example.com", "pw").await.unwrap();
        assert_eq!(login.token_type, "Bearer");
        assert_eq!(login.expires_in, 7 * 24 * 60 * 60);

        let claims = auth.verify_token(&login.access_token).unwrap();
        assert_eq!(claims.id, login.user.id);
        assert_eq!(claims.role, Role::User);
    }

    #[tokio::test]
    async fn test_login_failures_are_uniform() {
        let auth = service(true);
        auth.register("a@example.com", "pw", "A").await.unwrap();

        assert!(matches!(
            auth.login("a@example.com", "bad").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("b@example.com", "pw").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_old_claims_survive_rename() {
        let auth = service(true);
        auth.register("a@example.com", "pw", "A").await.unwrap();
        let login = auth.login("a@example.com", "pw").await.unwrap();
        let claims = auth.verify_token(&login.access_token).unwrap();

        let update = auth.update_profile(&claims, "Alice").await.unwrap();
        assert_eq!(update.user.name, "Alice");

        // The original token still carries the old name
        assert_eq!(auth.verify_token(&login.access_token).unwrap().name, "A");

        let fresh = update.access_token.unwrap();
        assert_eq!(auth.verify_token(&fresh).unwrap().name, "Alice");
    }

    #[tokio::test]
    async fn test_profile_update_without_reissue() {
        let auth = service(false);
        auth.register("a@example.com", "pw", "A").await.unwrap();
        let login = auth.login("a@example.com", "pw").await.unwrap();
        let claims = auth.verify_token(&login.access_token).unwrap();

        let update = auth.update_profile(&claims, "Alice").await.unwrap();
        assert!(update.access_token.is_none());
    }

    #[tokio::test]
    async fn test_set_role_unknown_user() {
        let auth = service(true);
        assert!(matches!(
            auth.set_role("missing", Role::Admin).await,
            Err(AuthError::UserNotFound)
        ));
    }
}
