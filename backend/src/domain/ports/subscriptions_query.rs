//! Driving port for reading followed authors.

use async_trait::async_trait;

use crate::domain::{AuthorWithRecipes, Error, RecipesLimit, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionsQuery: Send + Sync {
    /// Authors the user follows with their recipe previews.
    async fn subscriptions(
        &self,
        user: &UserId,
        limit: RecipesLimit,
    ) -> Result<Vec<AuthorWithRecipes>, Error>;

    /// One author as seen by `user`.
    async fn author(
        &self,
        user: &UserId,
        author: &UserId,
        limit: RecipesLimit,
    ) -> Result<AuthorWithRecipes, Error>;
}
