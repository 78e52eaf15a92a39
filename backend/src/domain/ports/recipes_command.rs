//! Driving port for author-only recipe mutations.

use async_trait::async_trait;

use crate::domain::{Error, RecipeDraft, RecipeDraftInput, RecipeId, RecipeView, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipesCommand: Send + Sync {
    /// Store the image and write the recipe with its join rows.
    async fn create(&self, author: &UserId, draft: RecipeDraft) -> Result<RecipeView, Error>;

    /// Replace a recipe. `not_found` and `forbidden` are decided before
    /// `input` is validated, so a non-author never sees field errors.
    async fn update(
        &self,
        actor: &UserId,
        id: RecipeId,
        input: RecipeDraftInput,
    ) -> Result<RecipeView, Error>;

    /// Delete a recipe. `forbidden` unless `actor` is the author.
    async fn delete(&self, actor: &UserId, id: RecipeId) -> Result<(), Error>;
}
