//! Port for follow relationships between users.
use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by subscription repository adapters.
    pub enum SubscriptionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "subscription repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "subscription repository query failed: {message}",
        /// The storage check constraint rejected a self-subscription.
        SelfSubscription => "users cannot subscribe to themselves",
        /// The followed user no longer exists.
        UnknownAuthor => "author does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert the pair. Returns `false` when it already existed.
    async fn subscribe(
        &self,
        user: &UserId,
        author: &UserId,
    ) -> Result<bool, SubscriptionRepositoryError>;

    /// Delete the pair. Returns `false` when it did not exist.
    async fn unsubscribe(
        &self,
        user: &UserId,
        author: &UserId,
    ) -> Result<bool, SubscriptionRepositoryError>;

    /// Which of `authors` the user follows.
    async fn followed_among(
        &self,
        user: &UserId,
        authors: &[UserId],
    ) -> Result<Vec<UserId>, SubscriptionRepositoryError>;

    /// Authors the user follows, ordered by username.
    async fn followed_authors(&self, user: &UserId)
    -> Result<Vec<User>, SubscriptionRepositoryError>;
}
