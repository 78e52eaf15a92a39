//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{PasswordHash, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email.
        DuplicateEmail => "email is already registered",
        /// Another account already uses the username.
        DuplicateUsername => "username is already taken",
    }
}

/// Stored credentials looked up during login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user_id: UserId,
    pub password_hash: PasswordHash,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Uniqueness violations surface as
    /// [`UserPersistenceError::DuplicateEmail`] or
    /// [`UserPersistenceError::DuplicateUsername`].
    async fn create(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// All users ordered by username.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Look up credentials by normalised email.
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Current password hash of a user.
    async fn find_password_hash(
        &self,
        id: &UserId,
    ) -> Result<Option<PasswordHash>, UserPersistenceError>;

    /// Replace a user's password hash.
    async fn update_password(
        &self,
        id: &UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError>;

    /// Set or clear the avatar path, returning the previous one.
    async fn replace_avatar(
        &self,
        id: &UserId,
        avatar: Option<String>,
    ) -> Result<Option<String>, UserPersistenceError>;
}
