//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types re-run the
//! domain validators, so a row that no longer satisfies them surfaces as a
//! query error instead of a malformed entity.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Email, Ingredient, IngredientId, PersonName, RecipeId, RecipeSummary, ShortCode, Tag, TagId,
    User, UserId, Username,
};

use super::schema::{
    cart_items, favorites, ingredients, recipe_ingredients, recipe_tags, recipes, subscriptions,
    tags, users,
};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Public columns of the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, String> {
        let email = Email::new(&self.email).map_err(|err| err.to_string())?;
        let username = Username::new(&self.username).map_err(|err| err.to_string())?;
        let first_name =
            PersonName::new(&self.first_name, "first_name").map_err(|err| err.to_string())?;
        let last_name =
            PersonName::new(&self.last_name, "last_name").map_err(|err| err.to_string())?;
        Ok(User::new(
            UserId::from_uuid(self.id),
            email,
            username,
            first_name,
            last_name,
        )
        .with_avatar(self.avatar))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: &'a str,
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Self {
            id: TagId::new(row.id),
            name: row.name,
            slug: row.slug,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IngredientRow {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Self {
            id: IngredientId::new(row.id),
            name: row.name,
            measurement_unit: row.measurement_unit,
        }
    }
}

// ---------------------------------------------------------------------------
// Recipes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: i64,
    pub author_id: Uuid,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub short_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RecipeRow {
    pub(crate) fn short_code(&self) -> Result<Option<ShortCode>, String> {
        self.short_code
            .as_deref()
            .map(ShortCode::new)
            .transpose()
            .map_err(|err| format!("recipe {}: {err}", self.id))
    }
}

/// Summary columns shared by membership and subscription responses.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeSummaryRow {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<RecipeSummaryRow> for RecipeSummary {
    fn from(row: RecipeSummaryRow) -> Self {
        Self {
            id: RecipeId::new(row.id),
            name: row.name,
            image: row.image,
            cooking_time: row.cooking_time,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub author_id: Uuid,
    pub name: &'a str,
    pub image: &'a str,
    pub text: &'a str,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
}

/// Changeset for recipe updates; a `None` image leaves the column untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipes)]
pub(crate) struct RecipeUpdate<'a> {
    pub name: &'a str,
    pub image: Option<&'a str>,
    pub text: &'a str,
    pub cooking_time: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipe_tags)]
pub(crate) struct RecipeTagRow {
    pub recipe_id: i64,
    pub tag_id: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipe_ingredients)]
pub(crate) struct RecipeIngredientRow {
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub amount: i32,
}

// ---------------------------------------------------------------------------
// Relationship pairs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = favorites)]
pub(crate) struct FavoriteRow {
    pub user_id: Uuid,
    pub recipe_id: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cart_items)]
pub(crate) struct CartItemRow {
    pub user_id: Uuid,
    pub recipe_id: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subscriptions)]
pub(crate) struct SubscriptionRow {
    pub user_id: Uuid,
    pub author_id: Uuid,
}
