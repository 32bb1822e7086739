//! Credential verification and password rotation.
//!
//! Passwords are stored as Argon2id PHC strings. Hashing and verification
//! are CPU-bound and run on the blocking pool; callers still await them
//! before responding.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::db::Store;
use crate::models::User;

/// Authentication service.
///
/// Verifies username/password pairs against the user store.
pub struct AuthService<'a> {
    store: &'a dyn Store,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Look up `username` and check `password` against its stored hash.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no such user exists.
    /// Returns `AuthError::BadPassword` if the password does not match.
    #[instrument(skip(self, password))]
    pub async fn verify(&self, username: &str, password: SecretString) -> Result<User, AuthError> {
        let user = self
            .store
            .find_user(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(password, user.password_hash.clone()).await?;

        Ok(user)
    }

    /// Replace the password of `username` after checking the old one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::BadPassword` if `old_password` does not match.
    /// Returns `AuthError::UserNotFound` if the user vanished meanwhile.
    #[instrument(skip(self, old_password, new_password))]
    pub async fn change_password(
        &self,
        username: &str,
        old_password: SecretString,
        new_password: SecretString,
    ) -> Result<(), AuthError> {
        self.verify(username, old_password).await?;

        let password_hash = hash_password(new_password).await?;
        if !self
            .store
            .update_password_hash(username, &password_hash)
            .await?
        {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(username, "password changed");
        Ok(())
    }
}

/// Hash a password using Argon2id with a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub async fn hash_password(password: SecretString) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.expose_secret().as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHash)
    })
    .await
    .map_err(|_| AuthError::PasswordHash)?
}

/// Verify a password against a stored hash.
///
/// A hash that cannot be parsed counts as a mismatch.
async fn verify_password(password: SecretString, hash: String) -> Result<(), AuthError> {
    tokio::task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&hash).map_err(|_| AuthError::BadPassword)?;
        Argon2::default()
            .verify_password(password.expose_secret().as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::BadPassword)
    })
    .await
    .map_err(|_| AuthError::PasswordHash)?
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, UserStore};

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    async fn store_with_admin(password: &str) -> MemoryStore {
        let store = MemoryStore::new();
        let password_hash = hash_password(secret(password)).await.unwrap();
        store
            .insert_user(&User {
                username: "admin".to_string(),
                password_hash,
                is_admin: true,
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_hash_is_salted_phc_string() {
        let first = hash_password(secret("hunter22")).await.unwrap();
        let second = hash_password(secret("hunter22")).await.unwrap();
        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_verify_accepts_correct_password() {
        let store = store_with_admin("s3cret-pass").await;
        let user = AuthService::new(&store)
            .verify("admin", secret("s3cret-pass"))
            .await
            .unwrap();
        assert_eq!(user.username, "admin");
        assert!(user.is_admin);
    }

    #[tokio::test]
    async fn test_verify_distinguishes_rejections() {
        let store = store_with_admin("s3cret-pass").await;
        let auth = AuthService::new(&store);

        let missing = auth.verify("nobody", secret("s3cret-pass")).await;
        assert!(matches!(missing, Err(AuthError::UserNotFound)));

        let wrong = auth.verify("admin", secret("guess")).await;
        assert!(matches!(wrong, Err(AuthError::BadPassword)));
    }

    #[tokio::test]
    async fn test_unparseable_hash_is_bad_password() {
        let store = MemoryStore::new();
        store
            .insert_user(&User {
                username: "admin".to_string(),
                password_hash: "not-a-phc-string".to_string(),
                is_admin: true,
            })
            .await
            .unwrap();

        let result = AuthService::new(&store)
            .verify("admin", secret("anything"))
            .await;
        assert!(matches!(result, Err(AuthError::BadPassword)));
    }

    #[tokio::test]
    async fn test_change_password_round_trip() {
        let store = store_with_admin("old-pass").await;
        let auth = AuthService::new(&store);

        auth.change_password("admin", secret("old-pass"), secret("new-pass"))
            .await
            .unwrap();

        assert!(auth.verify("admin", secret("new-pass")).await.is_ok());
        assert!(matches!(
            auth.verify("admin", secret("old-pass")).await,
            Err(AuthError::BadPassword)
        ));
    }

    #[tokio::test]
    async fn test_change_password_requires_old_password() {
        let store = store_with_admin("old-pass").await;
        let auth = AuthService::new(&store);

        let result = auth
            .change_password("admin", secret("wrong"), secret("new-pass"))
            .await;
        assert!(matches!(result, Err(AuthError::BadPassword)));
        assert!(auth.verify("admin", secret("old-pass")).await.is_ok());
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(AuthError::UserNotFound.user_message(), Some("User not found."));
        assert_eq!(AuthError::BadPassword.user_message(), Some("Incorrect password."));
        assert_eq!(AuthError::PasswordHash.user_message(), None);
    }
}
