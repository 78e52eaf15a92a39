//! Driving port for email-and-password sign-in.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Resolve credentials to the account they unlock.
    ///
    /// An unknown email and a wrong password both yield the same
    /// `unauthorized` error, so callers cannot probe for registered
    /// addresses.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}
