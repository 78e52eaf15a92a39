//! Driving port for user-facing queries.
//!
//! Inbound adapters (HTTP handlers) use this port to fetch user-visible data
//! without importing outbound persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, UserId, UserProfile};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// All users with `is_subscribed` computed for the viewer.
    async fn list_users<'a>(
        &self,
        viewer: Option<&'a UserId>,
    ) -> Result<Vec<UserProfile>, Error>;

    /// One user; `not_found` when the id is unknown.
    async fn get_user<'a>(
        &self,
        viewer: Option<&'a UserId>,
        id: &UserId,
    ) -> Result<UserProfile, Error>;
}
