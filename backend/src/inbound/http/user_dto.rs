//! JSON shapes for users, followed authors and recipe summaries.

use serde::{Deserialize, Serialize};

use crate::domain::{AuthorWithRecipes, RecipeSummary, User, UserProfile};

use super::state::HttpState;

/// User as returned to a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub email: String,
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

impl UserResponse {
    pub fn from_profile(profile: &UserProfile, state: &HttpState) -> Self {
        let user = &profile.user;
        Self {
            email: user.email().to_string(),
            id: user.id().to_string(),
            username: user.username().to_string(),
            first_name: user.first_name().as_ref().to_owned(),
            last_name: user.last_name().as_ref().to_owned(),
            is_subscribed: profile.is_subscribed,
            avatar: user.avatar().map(|path| state.media_url(path)),
        }
    }
}

/// Body of `POST /api/users`. Snake-case aliases keep older clients working.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    #[serde(alias = "first_name")]
    pub first_name: String,
    #[serde(alias = "last_name")]
    pub last_name: String,
    pub password: String,
}

/// Freshly registered account; never includes the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUserResponse {
    pub email: String,
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for RegisteredUserResponse {
    fn from(user: &User) -> Self {
        Self {
            email: user.email().to_string(),
            id: user.id().to_string(),
            username: user.username().to_string(),
            first_name: user.first_name().as_ref().to_owned(),
            last_name: user.last_name().as_ref().to_owned(),
        }
    }
}

/// Body of `POST /api/users/set_password`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPasswordRequest {
    #[serde(alias = "current_password")]
    pub current_password: String,
    #[serde(alias = "new_password")]
    pub new_password: String,
}

/// Body of `PUT /api/users/me/avatar`, and the avatar read/write response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AvatarPayload {
    pub avatar: Option<String>,
}

/// `id, name, image, cookingTime`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummaryResponse {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl RecipeSummaryResponse {
    pub fn from_summary(summary: &RecipeSummary, state: &HttpState) -> Self {
        Self {
            id: summary.id.get(),
            name: summary.name.clone(),
            image: state.media_url(&summary.image),
            cooking_time: summary.cooking_time,
        }
    }
}

/// A followed author with a preview of their recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorWithRecipesResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<RecipeSummaryResponse>,
    pub recipes_count: i64,
}

impl AuthorWithRecipesResponse {
    pub fn from_author(author: &AuthorWithRecipes, state: &HttpState) -> Self {
        Self {
            user: UserResponse::from_profile(&author.profile, state),
            recipes: author
                .recipes
                .iter()
                .map(|summary| RecipeSummaryResponse::from_summary(summary, state))
                .collect(),
            recipes_count: author.recipes_count,
        }
    }
}
