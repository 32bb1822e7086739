//! First-visit admin bootstrap.

use tracing::instrument;

use super::auth::{AuthError, hash_password};
use crate::config::BootstrapAdmin;
use crate::db::{RepositoryError, Store};
use crate::models::User;

/// Create the configured admin if the user collection is empty.
///
/// Returns `true` when this call created the admin. A concurrent request
/// that inserted the same username first counts as already bootstrapped.
///
/// # Errors
///
/// Returns `AuthError::Repository` if the store fails, or
/// `AuthError::PasswordHash` if the configured password cannot be hashed.
#[instrument(skip_all, fields(username = %admin.username))]
pub async fn ensure_admin(store: &dyn Store, admin: &BootstrapAdmin) -> Result<bool, AuthError> {
    if store.any_user_exists().await? {
        return Ok(false);
    }

    let password_hash = hash_password(admin.password.clone()).await?;
    let user = User {
        username: admin.username.clone(),
        password_hash,
        is_admin: true,
    };

    match store.insert_user(&user).await {
        Ok(()) => {
            tracing::info!("bootstrap admin created");
            Ok(true)
        }
        Err(RepositoryError::Conflict(_)) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
