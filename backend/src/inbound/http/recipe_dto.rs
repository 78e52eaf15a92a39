//! Recipe payloads: the read shape served to viewers and the write shape
//! accepted from authors.
//!
//! [`RecipePayload`] names the two explicitly. Write handlers accept
//! [`RecipePayload::Write`], validate it into a domain draft, and always
//! answer with [`RecipePayload::Read`].

use serde::{Deserialize, Serialize};

use crate::domain::{
    Error, Ingredient, RecipeDraft, RecipeDraftInput, RecipeDraftMode,
    RecipeView, Tag, UserProfile,
};

use super::state::HttpState;
use super::user_dto::UserResponse;

/// Tag as served by the catalogue and embedded in recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<&Tag> for TagResponse {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id.get(),
            name: tag.name.clone(),
            slug: tag.slug.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

impl From<&Ingredient> for IngredientResponse {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            id: ingredient.id.get(),
            name: ingredient.name.clone(),
            measurement_unit: ingredient.measurement_unit.clone(),
        }
    }
}

/// One ingredient line of a recipe read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredientResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Recipe as seen by a viewer, flags included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRead {
    pub id: i64,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

/// `{"id": <ingredient>, "amount": <n>}` in a write payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientAmountWrite {
    pub id: i64,
    pub amount: i64,
}

/// Author-supplied recipe. Every field is optional at the JSON level so
/// missing fields are reported together with invalid ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeWrite {
    #[serde(default)]
    pub ingredients: Option<Vec<IngredientAmountWrite>>,
    #[serde(default)]
    pub tags: Option<Vec<i64>>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, alias = "cooking_time")]
    pub cooking_time: Option<i64>,
}

impl From<RecipeWrite> for RecipeDraftInput {
    fn from(write: RecipeWrite) -> Self {
        Self {
            name: write.name,
            text: write.text,
            cooking_time: write.cooking_time,
            image: write.image,
            tags: write.tags,
            ingredients: write.ingredients.map(|lines| {
                lines
                    .into_iter()
                    .map(|line| (line.id, line.amount))
                    .collect()
            }),
        }
    }
}

/// The two recipe shapes exchanged over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecipePayload {
    Read(Box<RecipeRead>),
    Write(RecipeWrite),
}

impl RecipePayload {
    /// Read shape of `view`, with media paths made absolute.
    pub fn read(view: &RecipeView, state: &HttpState) -> Self {
        let recipe = &view.recipe;
        let author = UserResponse::from_profile(
            &UserProfile {
                user: recipe.author.clone(),
                is_subscribed: view.author_subscribed,
            },
            state,
        );
        Self::Read(Box::new(RecipeRead {
            id: recipe.id.get(),
            tags: recipe.tags.iter().map(TagResponse::from).collect(),
            author,
            ingredients: recipe
                .ingredients
                .iter()
                .map(|line| RecipeIngredientResponse {
                    id: line.ingredient.id.get(),
                    name: line.ingredient.name.clone(),
                    measurement_unit: line.ingredient.measurement_unit.clone(),
                    amount: line.amount,
                })
                .collect(),
            is_favorited: view.is_favorited,
            is_in_shopping_cart: view.is_in_shopping_cart,
            name: recipe.name.clone(),
            image: state.media_url(&recipe.image),
            text: recipe.text.clone(),
            cooking_time: recipe.cooking_time,
        }))
    }

    /// The raw write input, still unvalidated.
    pub fn into_input(self) -> Result<RecipeDraftInput, Error> {
        match self {
            Self::Write(write) => Ok(write.into()),
            Self::Read(_) => Err(Error::invalid_request(
                "a recipe read cannot be submitted as a write",
            )),
        }
    }

    /// Validate a write payload into a draft, reporting every failing field.
    pub fn into_draft(self, mode: RecipeDraftMode) -> Result<RecipeDraft, Error> {
        RecipeDraft::validate(self.into_input()?, mode)
    }
}
