//! Driving port for following and unfollowing authors.

use async_trait::async_trait;

use crate::domain::{AuthorWithRecipes, Error, RecipesLimit, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionsCommand: Send + Sync {
    /// Follow `author`. Self-follow is `invalid_request`; a repeated follow
    /// is a `conflict`.
    async fn subscribe(
        &self,
        user: &UserId,
        author: &UserId,
        limit: RecipesLimit,
    ) -> Result<AuthorWithRecipes, Error>;

    async fn unsubscribe(&self, user: &UserId, author: &UserId) -> Result<(), Error>;
}
