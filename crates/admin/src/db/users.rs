//! User repository.

use async_trait::async_trait;

use super::{PgStore, RepositoryError, conflict_or_database};
use crate::models::User;

/// Persistence for login accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Whether any user exists at all.
    async fn any_user_exists(&self) -> Result<bool, RepositoryError>;

    /// Get a user by username.
    async fn find_user(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    /// Insert a new user.
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    async fn insert_user(&self, user: &User) -> Result<(), RepositoryError>;

    /// Replace a user's password hash. Returns `false` if no such user.
    async fn update_password_hash(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<bool, RepositoryError>;
}

/// Internal row type for `PostgreSQL` user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    username: String,
    password_hash: String,
    is_admin: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            username: row.username,
            password_hash: row.password_hash,
            is_admin: row.is_admin,
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn any_user_exists(&self) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM roya.app_user)")
            .fetch_one(self.pool())
            .await?;
        Ok(exists)
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT username, password_hash, is_admin
            FROM roya.app_user
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(User::from))
    }

    async fn insert_user(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO roya.app_user (username, password_hash, is_admin)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .execute(self.pool())
        .await
        .map_err(|e| conflict_or_database(e, "username"))?;

        Ok(())
    }

    async fn update_password_hash(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE roya.app_user
            SET password_hash = $2
            WHERE username = $1
            ",
        )
        .bind(username)
        .bind(password_hash)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
