//! Port for recipe persistence.
//!
//! Writes replace a recipe's tag and ingredient join rows inside one storage
//! transaction, so a failed write never leaves a partial recipe behind.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    IngredientId, Recipe, RecipeFilter, RecipeId, RecipeSummary, TagId, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe repository query failed: {message}",
        /// A referenced tag does not exist.
        UnknownTag => "recipe references an unknown tag",
        /// A referenced ingredient does not exist.
        UnknownIngredient => "recipe references an unknown ingredient",
    }
}

/// Column values and join rows written for a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeWrite {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    /// Stored image path; `None` keeps the current image on update.
    pub image: Option<String>,
    pub tags: Vec<TagId>,
    pub ingredients: Vec<(IngredientId, i32)>,
}

/// Author and image of a stored recipe, used for permission checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeOwnership {
    pub author: UserId,
    pub image: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert a recipe with its join rows and return its id.
    async fn create(
        &self,
        author: &UserId,
        recipe: &RecipeWrite,
        created_at: DateTime<Utc>,
    ) -> Result<RecipeId, RecipePersistenceError>;

    /// Update the row and replace every join row. Returns `false` when the
    /// recipe no longer exists.
    async fn update(
        &self,
        id: RecipeId,
        recipe: &RecipeWrite,
    ) -> Result<bool, RecipePersistenceError>;

    /// Delete a recipe. Returns `false` when it did not exist.
    async fn delete(&self, id: RecipeId) -> Result<bool, RecipePersistenceError>;

    async fn find(&self, id: RecipeId) -> Result<Option<Recipe>, RecipePersistenceError>;

    async fn find_ownership(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeOwnership>, RecipePersistenceError>;

    async fn find_summary(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeSummary>, RecipePersistenceError>;

    /// Recipes matching the filter, newest first.
    async fn list(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>, RecipePersistenceError>;

    /// Newest recipe summaries of an author, truncated to `limit`, and the
    /// author's total recipe count.
    async fn author_summaries(
        &self,
        author: &UserId,
        limit: Option<i64>,
    ) -> Result<(Vec<RecipeSummary>, i64), RecipePersistenceError>;
}
