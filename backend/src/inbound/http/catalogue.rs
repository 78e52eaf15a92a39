//! Read-only tag and ingredient endpoints.
//!
//! ```text
//! GET /api/tags
//! GET /api/tags/{id}
//! GET /api/ingredients?name=fl
//! GET /api/ingredients/{id}
//! ```
//!
//! No pagination: the catalogue is small and fetched whole by clients.

use actix_web::{get, web};
use serde::Deserialize;

use crate::domain::{IngredientId, IngredientSearch, TagId};

use super::ApiResult;
use super::recipe_dto::{IngredientResponse, TagResponse};
use super::state::HttpState;
use super::validation::parse_id_path;

/// Query string accepted by the ingredient listing.
#[derive(Debug, Default, Deserialize)]
pub struct IngredientQuery {
    pub name: Option<String>,
}

#[get("/tags")]
pub async fn list_tags(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TagResponse>>> {
    let tags = state.catalogue.list_tags().await?;
    Ok(web::Json(tags.iter().map(TagResponse::from).collect()))
}

#[get("/tags/{id}")]
pub async fn get_tag(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TagResponse>> {
    let id = TagId::new(parse_id_path(&path, "tag")?);
    let tag = state.catalogue.get_tag(id).await?;
    Ok(web::Json(TagResponse::from(&tag)))
}

/// Ingredients, optionally narrowed to a case-insensitive name prefix.
#[get("/ingredients")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    query: web::Query<IngredientQuery>,
) -> ApiResult<web::Json<Vec<IngredientResponse>>> {
    let search = IngredientSearch::new(query.name.as_deref());
    let ingredients = state.catalogue.list_ingredients(search).await?;
    Ok(web::Json(
        ingredients.iter().map(IngredientResponse::from).collect(),
    ))
}

#[get("/ingredients/{id}")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<IngredientResponse>> {
    let id = IngredientId::new(parse_id_path(&path, "ingredient")?);
    let ingredient = state.catalogue.get_ingredient(id).await?;
    Ok(web::Json(IngredientResponse::from(&ingredient)))
}
