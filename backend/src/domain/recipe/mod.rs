//! Recipes, their ingredient lines and the viewer-specific read model.
//!
//! Writes go through [`RecipeDraft`], which validates a whole payload before
//! any storage is touched. Reads return [`RecipeView`], a [`Recipe`] plus the
//! flags derived for the requesting viewer.

mod draft;

use chrono::{DateTime, Utc};

use super::catalogue::{Ingredient, Tag, integer_id};
use super::short_link::ShortCode;
use super::user::{User, UserId};

pub use draft::{
    Amount, CookingTime, FieldError, FieldErrors, IngredientAmount, RecipeDraft, RecipeDraftInput,
    RecipeDraftMode, RecipeName, RecipeText,
};

/// Maximum length of a recipe name.
pub const RECIPE_NAME_MAX: usize = 150;
/// Maximum length of a recipe description.
pub const RECIPE_TEXT_MAX: usize = 5000;
/// Minimum cooking time in minutes.
pub const COOKING_TIME_MIN: i32 = 1;
/// Maximum cooking time in minutes.
pub const COOKING_TIME_MAX: i32 = 32_000;
/// Minimum amount of an ingredient line.
pub const AMOUNT_MIN: i32 = 1;
/// Maximum amount of an ingredient line.
pub const AMOUNT_MAX: i32 = 32_000;

integer_id!(
    /// Recipe primary key.
    RecipeId
);

/// One ingredient of a recipe with its amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredientLine {
    pub ingredient: Ingredient,
    pub amount: i32,
}

/// A stored recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub author: User,
    pub name: String,
    /// Media-relative path of the stored image.
    pub image: String,
    pub text: String,
    /// Cooking time in minutes.
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredientLine>,
    pub short_code: Option<ShortCode>,
}

impl Recipe {
    /// Lightweight summary used by membership responses and author listings.
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
            cooking_time: self.cooking_time,
        }
    }
}

/// Recipe as seen by a particular viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeView {
    pub recipe: Recipe,
    /// Whether the viewer follows the author.
    pub author_subscribed: bool,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Viewer flags computed for one recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewerFlags {
    pub author_subscribed: bool,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeView {
    /// Combine a recipe with the flags computed for its viewer.
    pub fn new(recipe: Recipe, flags: ViewerFlags) -> Self {
        Self {
            recipe,
            author_subscribed: flags.author_subscribed,
            is_favorited: flags.is_favorited,
            is_in_shopping_cart: flags.is_in_shopping_cart,
        }
    }
}

/// Short recipe representation: id, name, image and cooking time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

/// Client-facing list filters before they are bound to a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeListQuery {
    pub author: Option<UserId>,
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Storage-level recipe filter.
///
/// Tag slugs match any-of; membership filters restrict to one user's sets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeFilter {
    pub author: Option<UserId>,
    pub tag_slugs: Vec<String>,
    pub favorited_by: Option<UserId>,
    pub in_cart_of: Option<UserId>,
}

impl RecipeListQuery {
    /// Bind the query to a viewer. Membership flags are ignored for anonymous
    /// viewers.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{RecipeListQuery, UserId};
    ///
    /// let query = RecipeListQuery { is_favorited: true, ..RecipeListQuery::default() };
    /// assert!(query.clone().into_filter(None).favorited_by.is_none());
    /// let viewer = UserId::random();
    /// assert_eq!(query.into_filter(Some(&viewer)).favorited_by, Some(viewer));
    /// ```
    pub fn into_filter(self, viewer: Option<&UserId>) -> RecipeFilter {
        let mut tag_slugs: Vec<String> = self
            .tags
            .into_iter()
            .map(|slug| slug.trim().to_owned())
            .filter(|slug| !slug.is_empty())
            .collect();
        tag_slugs.sort();
        tag_slugs.dedup();
        RecipeFilter {
            author: self.author,
            tag_slugs,
            favorited_by: viewer.filter(|_| self.is_favorited).cloned(),
            in_cart_of: viewer.filter(|_| self.is_in_shopping_cart).cloned(),
        }
    }
}

#[cfg(test)]
mod tests;
