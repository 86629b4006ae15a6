use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};
use tokio::task;

use crate::config::SecurityConfig;
use crate::models::{Role, User};
use crate::store::StoreError;

/// Stored account row. Only the Argon2id hash of the password is kept.
#[derive(Debug, Clone)]
struct UserRecord {
    user: User,
    password_hash: String,
}

/// Registration input, already validated and trimmed by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Clone)]
pub struct UserRepository {
    users: Arc<RwLock<Vec<UserRecord>>>,
    security: SecurityConfig,
    /// Verified against when the email is unknown, so a miss costs as much as a wrong password.
    dummy_hash: Arc<OnceCell<String>>,
}

impl UserRepository {
    #[must_use]
    pub fn new(security: SecurityConfig) -> Self {
        Self {
            users: Arc::new(RwLock::new(Vec::new())),
            security,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Creates a `user` account. Email comparison is exact (case-sensitive).
    pub async fn register(&self, new_user: NewUser) -> Result<User, StoreError> {
        self.insert(new_user, Role::User).await
    }

    /// Creates the first `admin` account. Fails once any admin exists.
    pub async fn init_admin(&self, new_user: NewUser) -> Result<User, StoreError> {
        self.insert(new_user, Role::Admin).await
    }

    async fn hash(&self, password: String) -> Result<String> {
        let config = self.security.clone();
        task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")?
    }

    async fn insert(&self, new_user: NewUser, role: Role) -> Result<User, StoreError> {
        let password_hash = self.hash(new_user.password).await?;

        let mut users = self.users.write().await;

        if role == Role::Admin && users.iter().any(|r| r.user.role == Role::Admin) {
            return Err(StoreError::AdminExists);
        }

        if users.iter().any(|r| r.user.email == new_user.email) {
            return Err(StoreError::EmailTaken);
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: new_user.email,
            name: new_user.name,
            role,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        users.push(UserRecord {
            user: user.clone(),
            password_hash,
        });

        Ok(user)
    }

    /// Verify credentials and return the matching user.
    /// Note: Argon2 verification runs in `spawn_blocking`; the table lock is
    /// released before hashing starts.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>> {
        let record = {
            let users = self.users.read().await;
            users.iter().find(|r| r.user.email == email).cloned()
        };

        let (user, password_hash) = match record {
            Some(record) => (Some(record.user), record.password_hash),
            None => {
                let dummy = self
                    .dummy_hash
                    .get_or_try_init(|| self.hash("not-a-real-password".to_string()))
                    .await?;
                (None, dummy.clone())
            }
        };

        let password = password.to_string();
        let is_valid = task::spawn_blocking(move || verify_password(&password, &password_hash))
            .await
            .context("Password verification task panicked")??;

        Ok(user.filter(|_| is_valid))
    }

    pub async fn find_by_id(&self, id: &str) -> Option<User> {
        let users = self.users.read().await;
        users.iter().find(|r| r.user.id == id).map(|r| r.user.clone())
    }

    pub async fn update_name(&self, id: &str, name: &str) -> Option<User> {
        let mut users = self.users.write().await;
        let record = users.iter_mut().find(|r| r.user.id == id)?;
        record.user.name = name.to_string();
        Some(record.user.clone())
    }

    pub async fn set_role(&self, id: &str, role: Role) -> Option<User> {
        let mut users = self.users.write().await;
        let record = users.iter_mut().find(|r| r.user.id == id)?;
        record.user.role = role;
        Some(record.user.clone())
    }

    pub async fn has_admin(&self) -> bool {
        let users = self.users.read().await;
        users.iter().any(|r| r.user.role == Role::Admin)
    }

    /// All accounts in registration order.
    pub async fn list(&self) -> Vec<User> {
        let users = self.users.read().await;
        users.iter().map(|r| r.user.clone()).collect()
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the argon2 crate defaults.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Params are read back from the PHC string, so hashes made with any config verify.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_security() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 256,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        }
    }

    fn new_user(email: &str, password: &str, name: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_hash_is_salted_and_verifies() {
        let config = fast_security();
        let a = hash_password("hunter22", Some(&config)).unwrap();
        let b = hash_password("hunter22", Some(&config)).unwrap();

        assert_ne!(a, b);
        assert!(!a.contains("hunter22"));
        assert!(verify_password("hunter22", &a).unwrap());
        assert!(!verify_password("hunter23", &a).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(verify_password("x", "not-a-phc-string").is_err());
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let repo = UserRepository::new(fast_security());

        let user = repo
            .register(new_user("a@example.com", "pw-one", "A"))
            .await
            .unwrap();
        assert_eq!(user.role, Role::User);

        let err = repo
            .register(new_user("a@example.com", "pw-two", "Other"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::EmailTaken));

        // Case-sensitive match
        assert!(
            repo.register(new_user("A@example.com", "pw", "B"))
                .await
                .is_ok()
        );
        assert_eq!(repo.count().await, 2);
    }

    #[tokio::test]
    async fn test_init_admin_only_once() {
        let repo = UserRepository::new(fast_security());
        assert!(!repo.has_admin().await);

        let admin = repo
            .init_admin(new_user("root@example.com", "pw", "Root"))
            .await
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(repo.has_admin().await);

        let err = repo
            .init_admin(new_user("other@example.com", "pw", "Other"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AdminExists));
    }

    #[tokio::test]
    async fn test_concurrent_registrations_admit_one() {
        let repo = UserRepository::new(fast_security());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.register(new_user("race@example.com", "pw", &format!("R{i}")))
                        .await
                })
            })
            .collect();

        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_init_admin_admits_one() {
        let repo = UserRepository::new(fast_security());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.init_admin(new_user(&format!("admin{i}@example.com"), "pw", "Admin"))
                        .await
                })
            })
            .collect();

        let mut ok = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(StoreError::AdminExists) => rejected += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(rejected, 7);

        let admins = repo
            .list()
            .await
            .into_iter()
            .filter(|u| u.role == Role::Admin)
            .count();
        assert_eq!(admins, 1);
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_authenticate() {
        let repo = UserRepository::new(fast_security());
        let user = repo
            .register(new_user("a@example.com", "secret", "A"))
            .await
            .unwrap();

        let found = repo.authenticate("a@example.com", "secret").await.unwrap();
        assert_eq!(found, Some(user));

        assert!(
            repo.authenticate("a@example.com", "wrong")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            repo.authenticate("missing@example.com", "secret")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_unknown_email_still_runs_verification() {
        let repo = UserRepository::new(fast_security());
        assert!(!repo.dummy_hash.initialized());

        let found = repo
            .authenticate("ghost@example.com", "not-a-real-password")
            .await
            .unwrap();

        assert!(found.is_none());
        assert!(repo.dummy_hash.initialized());
    }

    #[tokio::test]
    async fn test_update_name_and_role() {
        let repo = UserRepository::new(fast_security());
        let user = repo
            .register(new_user("a@example.com", "pw", "A"))
            .await
            .unwrap();

        let renamed = repo.update_name(&user.id, "Alice").await.unwrap();
        assert_eq!(renamed.name, "Alice");

        let promoted = repo.set_role(&user.id, Role::Admin).await.unwrap();
        assert_eq!(promoted.role, Role::Admin);
        assert!(repo.has_admin().await);

        assert!(repo.update_name("nope", "X").await.is_none());
        assert!(repo.set_role("nope", Role::User).await.is_none());
        assert_eq!(repo.find_by_id(&user.id).await.unwrap().name, "Alice");
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let repo = UserRepository::new(fast_security());
        for email in ["c@x", "a@x", "b@x"] {
            repo.register(new_user(email, "pw", "N")).await.unwrap();
        }

        let emails: Vec<_> = repo.list().await.into_iter().map(|u| u.email).collect();
        assert_eq!(emails, vec!["c@x", "a@x", "b@x"]);
    }
}
