//! Read-side port for tags and ingredients.

use async_trait::async_trait;

use crate::domain::{Ingredient, IngredientId, IngredientSearch, Tag, TagId};

use super::define_port_error;

define_port_error! {
    /// Errors raised when reading reference data.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "catalogue read connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } =>
            "catalogue read query failed: {message}",
    }
}

/// Port for reading the tag and ingredient catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// All tags ordered by name.
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError>;

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogueRepositoryError>;

    /// Ingredients matching the search, ordered by name.
    async fn list_ingredients(
        &self,
        search: &IngredientSearch,
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError>;

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError>;
}
