//! PostgreSQL-backed catalogue read adapter for tags and ingredients.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{Ingredient, IngredientId, IngredientSearch, Tag, TagId};

use super::diesel_helpers::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{IngredientRow, TagRow};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, tags};

/// Diesel-backed implementation of the catalogue read port.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/foodgram")).await?;
    /// let repo = DieselCatalogueRepository::new(pool);
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogueRepositoryError {
    map_basic_pool_error(error, CatalogueRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogueRepositoryError {
    map_basic_diesel_error(
        error,
        CatalogueRepositoryError::query,
        CatalogueRepositoryError::connection,
    )
}

/// `LIKE` pattern matching names that start with `prefix`.
fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .select(TagRow::as_select())
            .order_by(tags::name.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = tags::table
            .find(id.get())
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Tag::from))
    }

    async fn list_ingredients(
        &self,
        search: &IngredientSearch,
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = ingredients::table
            .select(IngredientRow::as_select())
            .order_by((ingredients::name.asc(), ingredients::measurement_unit.asc()))
            .into_boxed();
        if let Some(prefix) = search.prefix() {
            query = query.filter(ingredients::name.ilike(prefix_pattern(prefix)));
        }
        let rows: Vec<IngredientRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<IngredientRow> = ingredients::table
            .find(id.get())
            .select(IngredientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Ingredient::from))
    }
}
