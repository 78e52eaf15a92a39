//! Driving port for account mutations: registration, passwords and avatars.

use async_trait::async_trait;

use crate::domain::{Error, ImageUpload, NewPassword, Registration, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account. Duplicate email or username is an
    /// `invalid_request` carrying the offending field.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Replace the password after verifying the current one.
    async fn set_password(
        &self,
        user: &UserId,
        current_password: &str,
        new_password: NewPassword,
    ) -> Result<(), Error>;

    /// Store a new avatar and return its media-relative path.
    async fn update_avatar(&self, user: &UserId, image: ImageUpload) -> Result<String, Error>;

    async fn clear_avatar(&self, user: &UserId) -> Result<(), Error>;
}
