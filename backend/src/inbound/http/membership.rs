//! Favourite and shopping-cart toggles.
//!
//! ```text
//! POST   /api/recipes/{id}/favorite
//! DELETE /api/recipes/{id}/favorite
//! POST   /api/recipes/{id}/shopping_cart
//! DELETE /api/recipes/{id}/shopping_cart
//! ```
//!
//! Adding twice and removing something absent both answer 400.

use actix_web::{HttpResponse, delete, post, web};

use crate::domain::MembershipKind;

use super::ApiResult;
use super::recipes::parse_recipe_path;
use super::session::SessionContext;
use super::state::HttpState;
use super::user_dto::RecipeSummaryResponse;
use super::validation::absent_relation_is_bad_request;

async fn add_member(
    kind: MembershipKind,
    state: &HttpState,
    session: &SessionContext,
    raw_id: &str,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let recipe = parse_recipe_path(raw_id)?;
    let summary = state.memberships.add(kind, &user, recipe).await?;
    Ok(HttpResponse::Created().json(RecipeSummaryResponse::from_summary(&summary, state)))
}

async fn remove_member(
    kind: MembershipKind,
    state: &HttpState,
    session: &SessionContext,
    raw_id: &str,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let recipe = parse_recipe_path(raw_id)?;
    state
        .memberships
        .remove(kind, &user, recipe)
        .await
        .map_err(absent_relation_is_bad_request)?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/recipes/{id}/favorite")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    add_member(MembershipKind::Favorite, &state, &session, &path).await
}

#[delete("/recipes/{id}/favorite")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    remove_member(MembershipKind::Favorite, &state, &session, &path).await
}

#[post("/recipes/{id}/shopping_cart")]
pub async fn add_to_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    add_member(MembershipKind::Cart, &state, &session, &path).await
}

#[delete("/recipes/{id}/shopping_cart")]
pub async fn remove_from_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    remove_member(MembershipKind::Cart, &state, &session, &path).await
}
