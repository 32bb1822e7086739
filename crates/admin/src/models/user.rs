//! User domain types.

/// A login account.
///
/// Created once by the bootstrap routine and afterwards only mutated by
/// the change-password operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique identity key.
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub is_admin: bool,
}
