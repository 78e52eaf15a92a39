//! Driving port for recipe reads, open to anonymous viewers.

use async_trait::async_trait;

use crate::domain::{Error, RecipeId, RecipeListQuery, RecipeView, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipesQuery: Send + Sync {
    /// Recipes matching the query, newest first.
    async fn list<'a>(
        &self,
        viewer: Option<&'a UserId>,
        query: RecipeListQuery,
    ) -> Result<Vec<RecipeView>, Error>;

    async fn get<'a>(
        &self,
        viewer: Option<&'a UserId>,
        id: RecipeId,
    ) -> Result<RecipeView, Error>;
}
