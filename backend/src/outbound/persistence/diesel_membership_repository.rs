//! PostgreSQL-backed favourite and shopping-cart pairs.
//!
//! Both sets share one shape, `(user_id, recipe_id)` with a composite primary
//! key, and differ only in table. Inserts use `ON CONFLICT DO NOTHING` so a
//! concurrent duplicate add resolves in the database as zero inserted rows.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MembershipRepository, MembershipRepositoryError};
use crate::domain::{MembershipKind, RecipeId, UserId};

use super::diesel_helpers::{
    ViolationKind, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
    warn_unrecognised_violation,
};
use super::models::{CartItemRow, FavoriteRow};
use super::pool::{DbPool, PoolError};
use super::schema::{cart_items, favorites};

/// Diesel-backed implementation of the membership repository port.
#[derive(Clone)]
pub struct DieselMembershipRepository {
    pool: DbPool,
}

impl DieselMembershipRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MembershipRepositoryError {
    map_basic_pool_error(error, MembershipRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MembershipRepositoryError {
    if let Some(violation) = constraint_violation(&error) {
        let recipe_fk =
            violation.is("favorites_recipe_id_fkey") || violation.is("cart_items_recipe_id_fkey");
        if violation.kind == ViolationKind::ForeignKey && recipe_fk {
            return MembershipRepositoryError::unknown_recipe();
        }
        warn_unrecognised_violation(&violation, "membership write");
    }
    map_basic_diesel_error(
        error,
        MembershipRepositoryError::query,
        MembershipRepositoryError::connection,
    )
}

#[async_trait]
impl MembershipRepository for DieselMembershipRepository {
    async fn add(
        &self,
        kind: MembershipKind,
        user: &UserId,
        recipe: RecipeId,
    ) -> Result<bool, MembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *user.as_uuid();
        let recipe_id = recipe.get();
        let inserted = match kind {
            MembershipKind::Favorite => {
                diesel::insert_into(favorites::table)
                    .values(&FavoriteRow { user_id, recipe_id })
                    .on_conflict((favorites::user_id, favorites::recipe_id))
                    .do_nothing()
                    .execute(&mut conn)
                    .await
            }
            MembershipKind::Cart => {
                diesel::insert_into(cart_items::table)
                    .values(&CartItemRow { user_id, recipe_id })
                    .on_conflict((cart_items::user_id, cart_items::recipe_id))
                    .do_nothing()
                    .execute(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;
        Ok(inserted > 0)
    }

    async fn remove(
        &self,
        kind: MembershipKind,
        user: &UserId,
        recipe: RecipeId,
    ) -> Result<bool, MembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *user.as_uuid();
        let deleted = match kind {
            MembershipKind::Favorite => {
                diesel::delete(
                    favorites::table
                        .filter(favorites::user_id.eq(user_id))
                        .filter(favorites::recipe_id.eq(recipe.get())),
                )
                .execute(&mut conn)
                .await
            }
            MembershipKind::Cart => {
                diesel::delete(
                    cart_items::table
                        .filter(cart_items::user_id.eq(user_id))
                        .filter(cart_items::recipe_id.eq(recipe.get())),
                )
                .execute(&mut conn)
                .await
            }
        }
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn members_among(
        &self,
        kind: MembershipKind,
        user: &UserId,
        recipes: &[RecipeId],
    ) -> Result<Vec<RecipeId>, MembershipRepositoryError> {
        if recipes.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *user.as_uuid();
        let ids: Vec<i64> = recipes.iter().map(|recipe| recipe.get()).collect();
        let members: Vec<i64> = match kind {
            MembershipKind::Favorite => {
                favorites::table
                    .filter(favorites::user_id.eq(user_id))
                    .filter(favorites::recipe_id.eq_any(ids))
                    .select(favorites::recipe_id)
                    .load(&mut conn)
                    .await
            }
            MembershipKind::Cart => {
                cart_items::table
                    .filter(cart_items::user_id.eq(user_id))
                    .filter(cart_items::recipe_id.eq_any(ids))
                    .select(cart_items::recipe_id)
                    .load(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;
        Ok(members.into_iter().map(RecipeId::new).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[rstest]
    #[case("favorites_recipe_id_fkey")]
    #[case("cart_items_recipe_id_fkey")]
    fn missing_recipe_maps_to_unknown_recipe(#[case] constraint: &str) {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new(format!("violates foreign key constraint \"{constraint}\"")),
        );
        assert_eq!(
            map_diesel_error(error),
            MembershipRepositoryError::UnknownRecipe
        );
    }

    #[rstest]
    fn missing_user_is_a_query_error() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new("violates foreign key constraint \"favorites_user_id_fkey\"".to_owned()),
        );
        assert!(matches!(
            map_diesel_error(error),
            MembershipRepositoryError::Query { .. }
        ));
    }
}
