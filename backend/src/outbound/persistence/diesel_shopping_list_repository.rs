//! PostgreSQL aggregation of a user's shopping cart.

use async_trait::async_trait;
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ShoppingListRepository, ShoppingListRepositoryError};
use crate::domain::{ShoppingItem, UserId};

use super::diesel_helpers::{map_basic_diesel_error, map_basic_pool_error};
use super::pool::{DbPool, PoolError};
use super::schema::{cart_items, ingredients, recipe_ingredients};

/// Diesel-backed implementation of the shopping-list aggregation port.
#[derive(Clone)]
pub struct DieselShoppingListRepository {
    pool: DbPool,
}

impl DieselShoppingListRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ShoppingListRepositoryError {
    map_basic_pool_error(error, ShoppingListRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ShoppingListRepositoryError {
    map_basic_diesel_error(
        error,
        ShoppingListRepositoryError::query,
        ShoppingListRepositoryError::connection,
    )
}

#[async_trait]
impl ShoppingListRepository for DieselShoppingListRepository {
    async fn cart_totals(
        &self,
        user: &UserId,
    ) -> Result<Vec<ShoppingItem>, ShoppingListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // SUM over INTEGER is BIGINT in PostgreSQL and NULL only for empty groups.
        let rows: Vec<(String, String, Option<i64>)> = recipe_ingredients::table
            .inner_join(ingredients::table)
            .inner_join(cart_items::table.on(cart_items::recipe_id.eq(recipe_ingredients::recipe_id)))
            .filter(cart_items::user_id.eq(*user.as_uuid()))
            .group_by((ingredients::name, ingredients::measurement_unit))
            .select((
                ingredients::name,
                ingredients::measurement_unit,
                sum(recipe_ingredients::amount),
            ))
            .order_by((ingredients::name.asc(), ingredients::measurement_unit.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(name, unit, total)| ShoppingItem::new(name, unit, total.unwrap_or_default()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn build_failure_is_a_connection_error() {
        let err = map_pool_error(PoolError::build("bad url"));
        assert_eq!(err, ShoppingListRepositoryError::connection("bad url"));
    }
}
