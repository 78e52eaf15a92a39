//! Driving port for favourite and shopping-cart toggles.

use async_trait::async_trait;

use crate::domain::{Error, MembershipKind, RecipeId, RecipeSummary, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipCommand: Send + Sync {
    /// Add a recipe to the set. A second add is a `conflict`.
    async fn add(
        &self,
        kind: MembershipKind,
        user: &UserId,
        recipe: RecipeId,
    ) -> Result<RecipeSummary, Error>;

    /// Remove a recipe. Absent pairs fail with a relation-absent `not_found`.
    async fn remove(
        &self,
        kind: MembershipKind,
        user: &UserId,
        recipe: RecipeId,
    ) -> Result<(), Error>;
}
