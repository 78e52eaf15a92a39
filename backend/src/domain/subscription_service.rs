//! Follow-graph service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    RecipePersistenceError, RecipeRepository, SubscriptionRepository, SubscriptionRepositoryError,
    SubscriptionsCommand, SubscriptionsQuery, UserPersistenceError, UserRepository,
};
use crate::domain::{AuthorWithRecipes, Error, RecipesLimit, User, UserId, UserProfile};

/// Subscription service implementing the follow command and query ports.
#[derive(Clone)]
pub struct SubscriptionService<U, S, R> {
    users: Arc<U>,
    subscriptions: Arc<S>,
    recipes: Arc<R>,
}

impl<U, S, R> SubscriptionService<U, S, R> {
    pub fn new(users: Arc<U>, subscriptions: Arc<S>, recipes: Arc<R>) -> Self {
        Self {
            users,
            subscriptions,
            recipes,
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        other => Error::internal(format!("user repository error: {other}")),
    }
}

fn map_subscription_error(error: SubscriptionRepositoryError) -> Error {
    match error {
        SubscriptionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("subscription repository unavailable: {message}"))
        }
        SubscriptionRepositoryError::Query { message } => {
            Error::internal(format!("subscription repository error: {message}"))
        }
        SubscriptionRepositoryError::SelfSubscription => self_subscription(),
        SubscriptionRepositoryError::UnknownAuthor => Error::not_found("author not found"),
    }
}

fn map_recipe_error(error: RecipePersistenceError) -> Error {
    match error {
        RecipePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        other => Error::internal(format!("recipe repository error: {other}")),
    }
}

fn self_subscription() -> Error {
    Error::invalid_request("users cannot subscribe to themselves")
}

impl<U, S, R> SubscriptionService<U, S, R>
where
    U: UserRepository,
    S: SubscriptionRepository,
    R: RecipeRepository,
{
    async fn author_or_not_found(&self, author: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(author)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {author} not found")))
    }

    async fn with_recipes(
        &self,
        user: User,
        is_subscribed: bool,
        limit: RecipesLimit,
    ) -> Result<AuthorWithRecipes, Error> {
        let (recipes, recipes_count) = self
            .recipes
            .author_summaries(user.id(), limit.get())
            .await
            .map_err(map_recipe_error)?;
        Ok(AuthorWithRecipes {
            profile: UserProfile {
                user,
                is_subscribed,
            },
            recipes,
            recipes_count,
        })
    }
}

#[async_trait]
impl<U, S, R> SubscriptionsCommand for SubscriptionService<U, S, R>
where
    U: UserRepository,
    S: SubscriptionRepository,
    R: RecipeRepository,
{
    async fn subscribe(
        &self,
        user: &UserId,
        author: &UserId,
        limit: RecipesLimit,
    ) -> Result<AuthorWithRecipes, Error> {
        if user == author {
            return Err(self_subscription());
        }
        let followed = self.author_or_not_found(author).await?;
        let inserted = self
            .subscriptions
            .subscribe(user, author)
            .await
            .map_err(map_subscription_error)?;
        if !inserted {
            return Err(Error::conflict(format!(
                "already subscribed to {}",
                followed.username()
            )));
        }
        self.with_recipes(followed, true, limit).await
    }

    async fn unsubscribe(&self, user: &UserId, author: &UserId) -> Result<(), Error> {
        let followed = self.author_or_not_found(author).await?;
        let removed = self
            .subscriptions
            .unsubscribe(user, author)
            .await
            .map_err(map_subscription_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::relation_absent(format!(
                "not subscribed to {}",
                followed.username()
            )))
        }
    }
}

#[async_trait]
impl<U, S, R> SubscriptionsQuery for SubscriptionService<U, S, R>
where
    U: UserRepository,
    S: SubscriptionRepository,
    R: RecipeRepository,
{
    async fn subscriptions(
        &self,
        user: &UserId,
        limit: RecipesLimit,
    ) -> Result<Vec<AuthorWithRecipes>, Error> {
        let authors = self
            .subscriptions
            .followed_authors(user)
            .await
            .map_err(map_subscription_error)?;
        let mut result = Vec::with_capacity(authors.len());
        for author in authors {
            result.push(self.with_recipes(author, true, limit).await?);
        }
        Ok(result)
    }

    async fn author(
        &self,
        user: &UserId,
        author: &UserId,
        limit: RecipesLimit,
    ) -> Result<AuthorWithRecipes, Error> {
        let followed = self.author_or_not_found(author).await?;
        let is_subscribed = !self
            .subscriptions
            .followed_among(user, std::slice::from_ref(author))
            .await
            .map_err(map_subscription_error)?
            .is_empty();
        self.with_recipes(followed, is_subscribed, limit).await
    }
}

#[cfg(test)]
#[path = "subscription_service_tests.rs"]
mod tests;
