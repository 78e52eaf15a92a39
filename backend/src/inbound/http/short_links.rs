//! Short recipe links.
//!
//! ```text
//! GET /api/recipes/{id}/get-link   -> {"shortLink": "https://host/s/aB3"}
//! GET /s/{code}                    -> 302 Location: https://host/recipes/{id}
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};
use serde::Serialize;

use super::ApiResult;
use super::recipes::parse_recipe_path;
use super::state::HttpState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkResponse {
    pub short_link: String,
}

/// Absolute short URL for a recipe, assigning a code on first request.
#[get("/recipes/{id}/get-link")]
pub async fn get_link(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ShortLinkResponse>> {
    let recipe = parse_recipe_path(&path)?;
    let code = state.short_links.ensure_short_link(recipe).await?;
    Ok(web::Json(ShortLinkResponse {
        short_link: state.absolute_url(&format!("s/{code}")),
    }))
}

/// Redirect a short code to the recipe page. Mounted outside `/api`.
#[get("/s/{code}")]
pub async fn follow_link(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let recipe = state.short_links.resolve_short_link(&path).await?;
    let location = state.absolute_url(&format!("recipes/{recipe}"));
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Error, RecipeId, ShortCode};
    use crate::inbound::http::test_utils::MockPorts;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::Value;

    #[actix_web::test]
    async fn get_link_returns_an_absolute_short_url() {
        let mut ports = MockPorts::default();
        ports
            .short_links
            .expect_ensure_short_link()
            .withf(|recipe| recipe.get() == 8)
            .return_once(|_| Ok(ShortCode::new("aB3").expect("fixture code")));
        let app = test::init_service(
            App::new()
                .app_data(ports.into_state())
                .service(web::scope("/api").service(get_link)),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/recipes/8/get-link")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["shortLink"], "http://foodgram.test/s/aB3");
        assert!(body.get("short-link").is_none());
    }

    #[actix_web::test]
    async fn known_code_redirects_to_the_recipe() {
        let mut ports = MockPorts::default();
        ports
            .short_links
            .expect_resolve_short_link()
            .withf(|code| code == "aB3")
            .return_once(|_| Ok(RecipeId::new(8)));
        let app =
            test::init_service(App::new().app_data(ports.into_state()).service(follow_link)).await;

        let response =
            test::call_service(&app, test::TestRequest::get().uri("/s/aB3").to_request()).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok());
        assert_eq!(location, Some("http://foodgram.test/recipes/8"));
    }

    #[actix_web::test]
    async fn unknown_code_is_not_found() {
        let mut ports = MockPorts::default();
        ports
            .short_links
            .expect_resolve_short_link()
            .return_once(|_| Err(Error::not_found("short link not found")));
        let app =
            test::init_service(App::new().app_data(ports.into_state()).service(follow_link)).await;

        let response =
            test::call_service(&app, test::TestRequest::get().uri("/s/zzz").to_request()).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
