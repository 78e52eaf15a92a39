//! Port for favourite and shopping-cart membership pairs.

use async_trait::async_trait;

use crate::domain::{MembershipKind, RecipeId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by membership repository adapters.
    pub enum MembershipRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "membership repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "membership repository query failed: {message}",
        /// The recipe vanished before the pair was written.
        UnknownRecipe => "recipe does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Insert the pair. Returns `false` when it already existed.
    async fn add(
        &self,
        kind: MembershipKind,
        user: &UserId,
        recipe: RecipeId,
    ) -> Result<bool, MembershipRepositoryError>;

    /// Delete the pair. Returns `false` when it did not exist.
    async fn remove(
        &self,
        kind: MembershipKind,
        user: &UserId,
        recipe: RecipeId,
    ) -> Result<bool, MembershipRepositoryError>;

    /// Which of `recipes` are in the user's set.
    async fn members_among(
        &self,
        kind: MembershipKind,
        user: &UserId,
        recipes: &[RecipeId],
    ) -> Result<Vec<RecipeId>, MembershipRepositoryError>;
}
