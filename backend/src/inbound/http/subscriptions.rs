//! Follow management.
//!
//! ```text
//! GET    /api/users/subscriptions?recipes_limit=3
//! POST   /api/users/{id}/subscribe?recipes_limit=3
//! GET    /api/users/{id}/subscribe?recipes_limit=3
//! DELETE /api/users/{id}/subscribe
//! ```
//!
//! `/users/subscriptions` must be registered before `/users/{id}`.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::Deserialize;

use super::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;
use super::user_dto::AuthorWithRecipesResponse;
use super::validation::{absent_relation_is_bad_request, parse_recipes_limit, parse_user_path};

/// Optional bound on embedded recipe previews.
#[derive(Debug, Default, Deserialize)]
pub struct RecipesLimitQuery {
    pub recipes_limit: Option<i64>,
}

/// Authors the caller follows.
#[get("/users/subscriptions")]
pub async fn list_subscriptions(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RecipesLimitQuery>,
) -> ApiResult<web::Json<Vec<AuthorWithRecipesResponse>>> {
    let user = session.require_user_id()?;
    let limit = parse_recipes_limit(query.recipes_limit)?;
    let authors = state.subscriptions_query.subscriptions(&user, limit).await?;
    Ok(web::Json(
        authors
            .iter()
            .map(|author| AuthorWithRecipesResponse::from_author(author, &state))
            .collect(),
    ))
}

#[post("/users/{id}/subscribe")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<RecipesLimitQuery>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let author = parse_user_path(&path)?;
    let limit = parse_recipes_limit(query.recipes_limit)?;
    let followed = state.subscriptions.subscribe(&user, &author, limit).await?;
    Ok(HttpResponse::Created().json(AuthorWithRecipesResponse::from_author(&followed, &state)))
}

/// One author with recipe previews, `isSubscribed` from the caller's view.
#[get("/users/{id}/subscribe")]
pub async fn get_subscription(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<RecipesLimitQuery>,
) -> ApiResult<web::Json<AuthorWithRecipesResponse>> {
    let user = session.require_user_id()?;
    let author = parse_user_path(&path)?;
    let limit = parse_recipes_limit(query.recipes_limit)?;
    let view = state.subscriptions_query.author(&user, &author, limit).await?;
    Ok(web::Json(AuthorWithRecipesResponse::from_author(&view, &state)))
}

#[delete("/users/{id}/subscribe")]
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let author = parse_user_path(&path)?;
    state
        .subscriptions
        .unsubscribe(&user, &author)
        .await
        .map_err(absent_relation_is_bad_request)?;
    Ok(HttpResponse::NoContent().finish())
}
