//! PostgreSQL-backed short-code storage.
//!
//! Assignment is get-or-set: `UPDATE ... WHERE short_code IS NULL` followed
//! by a re-read, with `recipes_short_code_key` as the arbiter between two
//! recipes drawing the same code.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{ShortCodeLookup, ShortLinkRepository, ShortLinkRepositoryError};
use crate::domain::{RecipeId, ShortCode};

use super::diesel_helpers::{
    ViolationKind, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::pool::{DbPool, PoolError};
use super::schema::recipes;

/// Diesel-backed implementation of the short-link repository port.
#[derive(Clone)]
pub struct DieselShortLinkRepository {
    pool: DbPool,
}

impl DieselShortLinkRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ShortLinkRepositoryError {
    map_basic_pool_error(error, ShortLinkRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ShortLinkRepositoryError {
    let taken = constraint_violation(&error).is_some_and(|violation| {
        violation.kind == ViolationKind::Unique && violation.is("recipes_short_code_key")
    });
    if taken {
        return ShortLinkRepositoryError::code_taken();
    }
    map_basic_diesel_error(
        error,
        ShortLinkRepositoryError::query,
        ShortLinkRepositoryError::connection,
    )
}

fn to_lookup(stored: Option<Option<String>>) -> Result<ShortCodeLookup, ShortLinkRepositoryError> {
    match stored {
        None => Ok(ShortCodeLookup::MissingRecipe),
        Some(None) => Ok(ShortCodeLookup::Unassigned),
        Some(Some(raw)) => ShortCode::new(&raw)
            .map(ShortCodeLookup::Assigned)
            .map_err(|err| ShortLinkRepositoryError::query(format!("stored code {raw:?}: {err}"))),
    }
}

async fn read_code(
    conn: &mut AsyncPgConnection,
    recipe: RecipeId,
) -> Result<ShortCodeLookup, ShortLinkRepositoryError> {
    let stored: Option<Option<String>> = recipes::table
        .find(recipe.get())
        .select(recipes::short_code)
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    to_lookup(stored)
}

#[async_trait]
impl ShortLinkRepository for DieselShortLinkRepository {
    async fn lookup(&self, recipe: RecipeId) -> Result<ShortCodeLookup, ShortLinkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        read_code(&mut conn, recipe).await
    }

    async fn code_in_use(&self, code: &ShortCode) -> Result<bool, ShortLinkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            recipes::table.filter(recipes::short_code.eq(code.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn assign_if_absent(
        &self,
        recipe: RecipeId,
        code: &ShortCode,
    ) -> Result<ShortCodeLookup, ShortLinkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(
            recipes::table
                .filter(recipes::id.eq(recipe.get()))
                .filter(recipes::short_code.is_null()),
        )
        .set(recipes::short_code.eq(code.as_str()))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        read_code(&mut conn, recipe).await
    }

    async fn resolve(
        &self,
        code: &ShortCode,
    ) -> Result<Option<RecipeId>, ShortLinkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id: Option<i64> = recipes::table
            .filter(recipes::short_code.eq(code.as_str()))
            .select(recipes::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(id.map(RecipeId::new))
    }
}
