//! Catalogue service exposing tags and ingredients.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{CatalogueQuery, CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{Error, Ingredient, IngredientId, IngredientSearch, Tag, TagId};

/// Read-only catalogue service.
#[derive(Clone)]
pub struct CatalogueService<C> {
    repository: Arc<C>,
}

impl<C> CatalogueService<C> {
    pub fn new(repository: Arc<C>) -> Self {
        Self { repository }
    }
}

fn map_catalogue_error(error: CatalogueRepositoryError) -> Error {
    match error {
        CatalogueRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("catalogue repository unavailable: {message}"))
        }
        CatalogueRepositoryError::Query { message } => {
            Error::internal(format!("catalogue repository error: {message}"))
        }
    }
}

#[async_trait]
impl<C> CatalogueQuery for CatalogueService<C>
where
    C: CatalogueRepository,
{
    async fn list_tags(&self) -> Result<Vec<Tag>, Error> {
        self.repository
            .list_tags()
            .await
            .map_err(map_catalogue_error)
    }

    async fn get_tag(&self, id: TagId) -> Result<Tag, Error> {
        self.repository
            .find_tag(id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("tag {id} not found")))
    }

    async fn list_ingredients(&self, search: IngredientSearch) -> Result<Vec<Ingredient>, Error> {
        self.repository
            .list_ingredients(&search)
            .await
            .map_err(map_catalogue_error)
    }

    async fn get_ingredient(&self, id: IngredientId) -> Result<Ingredient, Error> {
        self.repository
            .find_ingredient(id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("ingredient {id} not found")))
    }
}
