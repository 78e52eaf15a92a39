//! PostgreSQL-backed recipe repository.
//!
//! Creates and updates run in one transaction: the recipe row is written,
//! every tag and ingredient join row is deleted and the new set is
//! bulk-inserted. A foreign-key violation on a join row rolls the whole write
//! back and surfaces as an unknown tag or ingredient.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{
    RecipeOwnership, RecipePersistenceError, RecipeRepository, RecipeWrite,
};
use crate::domain::{
    Ingredient, Recipe, RecipeFilter, RecipeId, RecipeIngredientLine, RecipeSummary, Tag, UserId,
};

use super::diesel_helpers::{
    ViolationKind, collect_rows, constraint_violation, map_basic_diesel_error,
    map_basic_pool_error, warn_unrecognised_violation,
};
use super::models::{
    IngredientRow, NewRecipeRow, RecipeIngredientRow, RecipeRow, RecipeSummaryRow, RecipeTagRow,
    RecipeUpdate, TagRow, UserRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{
    cart_items, favorites, ingredients, recipe_ingredients, recipe_tags, recipes, tags, users,
};

/// Diesel-backed implementation of the recipe repository port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipePersistenceError {
    map_basic_pool_error(error, RecipePersistenceError::connection)
}

fn map_diesel_error(error: DieselError) -> RecipePersistenceError {
    if let Some(violation) = constraint_violation(&error) {
        match violation.kind {
            ViolationKind::ForeignKey if violation.is("recipe_tags_tag_id_fkey") => {
                return RecipePersistenceError::unknown_tag();
            }
            ViolationKind::ForeignKey if violation.is("recipe_ingredients_ingredient_id_fkey") => {
                return RecipePersistenceError::unknown_ingredient();
            }
            _ => warn_unrecognised_violation(&violation, "recipe write"),
        }
    }
    map_basic_diesel_error(
        error,
        RecipePersistenceError::query,
        RecipePersistenceError::connection,
    )
}

/// Delete the join rows of `recipe_id` and insert the set from `recipe`.
async fn replace_join_rows(
    conn: &mut AsyncPgConnection,
    recipe_id: i64,
    recipe: &RecipeWrite,
) -> QueryResult<()> {
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
        .execute(conn)
        .await?;
    diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
        .execute(conn)
        .await?;

    let tag_rows: Vec<RecipeTagRow> = recipe
        .tags
        .iter()
        .map(|tag| RecipeTagRow {
            recipe_id,
            tag_id: tag.get(),
        })
        .collect();
    diesel::insert_into(recipe_tags::table)
        .values(&tag_rows)
        .execute(conn)
        .await?;

    let ingredient_rows: Vec<RecipeIngredientRow> = recipe
        .ingredients
        .iter()
        .map(|(ingredient, amount)| RecipeIngredientRow {
            recipe_id,
            ingredient_id: ingredient.get(),
            amount: *amount,
        })
        .collect();
    diesel::insert_into(recipe_ingredients::table)
        .values(&ingredient_rows)
        .execute(conn)
        .await?;
    Ok(())
}

fn assemble(
    row: RecipeRow,
    author: UserRow,
    tags: Vec<Tag>,
    ingredients: Vec<RecipeIngredientLine>,
) -> Result<Recipe, String> {
    let short_code = row.short_code()?;
    Ok(Recipe {
        id: RecipeId::new(row.id),
        author: author.into_user()?,
        name: row.name,
        image: row.image,
        text: row.text,
        cooking_time: row.cooking_time,
        created_at: row.created_at,
        tags,
        ingredients,
        short_code,
    })
}

/// Attach tags and ingredient lines to loaded recipe rows, preserving order.
async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<(RecipeRow, UserRow)>,
) -> Result<Vec<Recipe>, RecipePersistenceError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = rows.iter().map(|(recipe, _)| recipe.id).collect();

    let tag_rows: Vec<(i64, TagRow)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(ids.clone()))
        .select((recipe_tags::recipe_id, TagRow::as_select()))
        .order_by(tags::name.asc())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let mut tags_by_recipe: HashMap<i64, Vec<Tag>> = HashMap::new();
    for (recipe_id, tag) in tag_rows {
        tags_by_recipe.entry(recipe_id).or_default().push(tag.into());
    }

    let ingredient_rows: Vec<(i64, i32, IngredientRow)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(ids))
        .select((
            recipe_ingredients::recipe_id,
            recipe_ingredients::amount,
            IngredientRow::as_select(),
        ))
        .order_by(ingredients::name.asc())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let mut lines_by_recipe: HashMap<i64, Vec<RecipeIngredientLine>> = HashMap::new();
    for (recipe_id, amount, ingredient) in ingredient_rows {
        lines_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(RecipeIngredientLine {
                ingredient: Ingredient::from(ingredient),
                amount,
            });
    }

    collect_rows(
        rows.into_iter().map(|(recipe, author)| {
            let tags = tags_by_recipe.remove(&recipe.id).unwrap_or_default();
            let lines = lines_by_recipe.remove(&recipe.id).unwrap_or_default();
            assemble(recipe, author, tags, lines)
        }),
        RecipePersistenceError::query,
    )
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn create(
        &self,
        author: &UserId,
        recipe: &RecipeWrite,
        created_at: DateTime<Utc>,
    ) -> Result<RecipeId, RecipePersistenceError> {
        let Some(image) = recipe.image.as_deref() else {
            return Err(RecipePersistenceError::query("new recipe without an image"));
        };
        let new_row = NewRecipeRow {
            author_id: *author.as_uuid(),
            name: recipe.name.as_str(),
            image,
            text: recipe.text.as_str(),
            cooking_time: recipe.cooking_time,
            created_at,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = conn
            .transaction(|conn| {
                async move {
                    let id: i64 = diesel::insert_into(recipes::table)
                        .values(&new_row)
                        .returning(recipes::id)
                        .get_result(conn)
                        .await?;
                    replace_join_rows(conn, id, recipe).await?;
                    Ok(id)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(RecipeId::new(id))
    }

    async fn update(
        &self,
        id: RecipeId,
        recipe: &RecipeWrite,
    ) -> Result<bool, RecipePersistenceError> {
        let changes = RecipeUpdate {
            name: recipe.name.as_str(),
            image: recipe.image.as_deref(),
            text: recipe.text.as_str(),
            cooking_time: recipe.cooking_time,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let updated = diesel::update(recipes::table.find(id.get()))
                    .set(&changes)
                    .execute(conn)
                    .await?;
                if updated == 0 {
                    return Ok(false);
                }
                replace_join_rows(conn, id.get(), recipe).await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(recipes::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find(&self, id: RecipeId) -> Result<Option<Recipe>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(RecipeRow, UserRow)> = recipes::table
            .inner_join(users::table)
            .filter(recipes::id.eq(id.get()))
            .select((RecipeRow::as_select(), UserRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(hydrate(&mut conn, vec![row]).await?.pop())
    }

    async fn find_ownership(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeOwnership>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(uuid::Uuid, String)> = recipes::table
            .find(id.get())
            .select((recipes::author_id, recipes::image))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(|(author, image)| RecipeOwnership {
            author: UserId::from_uuid(author),
            image,
        }))
    }

    async fn find_summary(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeSummary>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RecipeSummaryRow> = recipes::table
            .find(id.get())
            .select(RecipeSummaryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(RecipeSummary::from))
    }

    async fn list(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = recipes::table
            .inner_join(users::table)
            .select((RecipeRow::as_select(), UserRow::as_select()))
            .order_by((recipes::created_at.desc(), recipes::id.desc()))
            .into_boxed();

        if let Some(author) = &filter.author {
            query = query.filter(recipes::author_id.eq(*author.as_uuid()));
        }
        if !filter.tag_slugs.is_empty() {
            let tagged = recipe_tags::table
                .inner_join(tags::table)
                .filter(tags::slug.eq_any(filter.tag_slugs.clone()))
                .select(recipe_tags::recipe_id);
            query = query.filter(recipes::id.eq_any(tagged));
        }
        if let Some(user) = &filter.favorited_by {
            let favorited = favorites::table
                .filter(favorites::user_id.eq(*user.as_uuid()))
                .select(favorites::recipe_id);
            query = query.filter(recipes::id.eq_any(favorited));
        }
        if let Some(user) = &filter.in_cart_of {
            let in_cart = cart_items::table
                .filter(cart_items::user_id.eq(*user.as_uuid()))
                .select(cart_items::recipe_id);
            query = query.filter(recipes::id.eq_any(in_cart));
        }

        let rows: Vec<(RecipeRow, UserRow)> =
            query.load(&mut conn).await.map_err(map_diesel_error)?;
        hydrate(&mut conn, rows).await
    }

    async fn author_summaries(
        &self,
        author: &UserId,
        limit: Option<i64>,
    ) -> Result<(Vec<RecipeSummary>, i64), RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let author_id = *author.as_uuid();
        let count: i64 = recipes::table
            .filter(recipes::author_id.eq(author_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut query = recipes::table
            .filter(recipes::author_id.eq(author_id))
            .select(RecipeSummaryRow::as_select())
            .order_by((recipes::created_at.desc(), recipes::id.desc()))
            .into_boxed();
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        let rows: Vec<RecipeSummaryRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok((rows.into_iter().map(RecipeSummary::from).collect(), count))
    }
}
