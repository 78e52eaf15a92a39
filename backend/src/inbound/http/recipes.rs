//! Recipe CRUD handlers.
//!
//! ```text
//! GET    /api/recipes?author=<uuid>&tags=breakfast&tags=lunch&is_favorited=1
//! POST   /api/recipes
//! GET    /api/recipes/{id}
//! PATCH  /api/recipes/{id}
//! DELETE /api/recipes/{id}
//! ```
//!
//! Write handlers accept [`RecipeWrite`] and always answer with the read
//! shape, so clients see the flags and absolute image URL straight away.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use uuid::Uuid;

use crate::domain::{Error, FieldErrors, RecipeDraftMode, RecipeId, RecipeListQuery, UserId};

use super::ApiResult;
use super::recipe_dto::{RecipePayload, RecipeWrite};
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::{FieldName, parse_flag, parse_id_path};

const IS_FAVORITED: FieldName = FieldName::new("is_favorited");
const IS_IN_SHOPPING_CART: FieldName = FieldName::new("is_in_shopping_cart");

/// Build a list query from raw query pairs. `tags` may repeat; unknown keys
/// are ignored.
fn list_query(pairs: &[(String, String)]) -> Result<RecipeListQuery, Error> {
    let mut query = RecipeListQuery::default();
    for (key, value) in pairs {
        match key.as_str() {
            "author" => {
                let author = Uuid::parse_str(value.trim())
                    .map_err(|_| FieldErrors::single_error("author", "must be a user id"))?;
                query.author = Some(UserId::from_uuid(author));
            }
            "tags" => {
                let slug = value.trim();
                if !slug.is_empty() {
                    query.tags.push(slug.to_owned());
                }
            }
            "is_favorited" => query.is_favorited = parse_flag(IS_FAVORITED, value)?,
            "is_in_shopping_cart" => {
                query.is_in_shopping_cart = parse_flag(IS_IN_SHOPPING_CART, value)?;
            }
            _ => {}
        }
    }
    Ok(query)
}

pub(crate) fn parse_recipe_path(raw: &str) -> Result<RecipeId, Error> {
    parse_id_path(raw, "recipe").map(RecipeId::new)
}

/// Recipes visible to everyone, newest first.
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<Vec<(String, String)>>,
) -> ApiResult<web::Json<Vec<RecipePayload>>> {
    let viewer = session.user_id()?;
    let query = list_query(&query)?;
    let views = state.recipes_query.list(viewer.as_ref(), query).await?;
    Ok(web::Json(
        views
            .iter()
            .map(|view| RecipePayload::read(view, &state))
            .collect(),
    ))
}

#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RecipeWrite>,
) -> ApiResult<HttpResponse> {
    let author = session.require_user_id()?;
    let draft = RecipePayload::Write(payload.into_inner()).into_draft(RecipeDraftMode::Create)?;
    let view = state.recipes.create(&author, draft).await?;
    Ok(HttpResponse::Created().json(RecipePayload::read(&view, &state)))
}

#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RecipePayload>> {
    let id = parse_recipe_path(&path)?;
    let viewer = session.user_id()?;
    let view = state.recipes_query.get(viewer.as_ref(), id).await?;
    Ok(web::Json(RecipePayload::read(&view, &state)))
}

/// Replace a recipe; only its author may. Authorship is settled before the
/// body is validated.
#[patch("/recipes/{id}")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RecipeWrite>,
) -> ApiResult<web::Json<RecipePayload>> {
    let actor = session.require_user_id()?;
    let id = parse_recipe_path(&path)?;
    let input = RecipePayload::Write(payload.into_inner()).into_input()?;
    let view = state.recipes.update(&actor, id, input).await?;
    Ok(web::Json(RecipePayload::read(&view, &state)))
}

#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let id = parse_recipe_path(&path)?;
    state.recipes.delete(&actor, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;
