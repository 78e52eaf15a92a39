//! Shared harness for HTTP flow tests.
//!
//! Wires the real domain services and outbound adapters around a
//! [`MemoryStore`], so flows exercise everything except SQL.

pub mod memory_store;

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;

use foodgram::Trace;
use foodgram::domain::{
    AccountService, CatalogueService, Ingredient, IngredientId, MembershipService, RecipeService,
    ShoppingListService, ShortLinkService, SubscriptionService, Tag, TagId,
};
use foodgram::inbound::http::auth::{login, logout};
use foodgram::inbound::http::catalogue::{get_ingredient, get_tag, list_ingredients, list_tags};
use foodgram::inbound::http::membership::{
    add_favorite, add_to_cart, remove_favorite, remove_from_cart,
};
use foodgram::inbound::http::recipes::{
    create_recipe, delete_recipe, get_recipe, list_recipes, update_recipe,
};
use foodgram::inbound::http::shopping_list::download_shopping_cart;
use foodgram::inbound::http::short_links::{follow_link, get_link};
use foodgram::inbound::http::state::{HttpState, HttpStatePorts};
use foodgram::inbound::http::subscriptions::{
    get_subscription, list_subscriptions, subscribe, unsubscribe,
};
use foodgram::inbound::http::users::{
    current_user, delete_avatar, get_avatar, get_user, list_users, put_avatar, register,
    set_password,
};
use foodgram::inbound::http::validation::{json_config, query_config};
use foodgram::outbound::crypto::Argon2PasswordHasher;
use foodgram::outbound::export::{DocumentRenderer, RenderConfig};
use foodgram::outbound::media::CapStdImageStore;

pub use memory_store::MemoryStore;

/// One-pixel PNG header; enough for the upload decoder.
pub const PIXEL: &str = "data:image/png;base64,iVBORw0KGgo=";

pub const PASSWORD: &str = "correct-horse";

/// Catalogue seeded into every store: tag 1 and ingredient 1.
pub fn seeded_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_catalogue(
        vec![Tag {
            id: TagId::new(1),
            name: "Breakfast".to_owned(),
            slug: "breakfast".to_owned(),
        }],
        vec![Ingredient {
            id: IngredientId::new(1),
            name: "flour".to_owned(),
            measurement_unit: "g".to_owned(),
        }],
    ))
}

fn http_state(store: Arc<MemoryStore>, media: &TempDir) -> web::Data<HttpState> {
    let images = Arc::new(CapStdImageStore::open(media.path()).expect("media root"));
    let accounts = Arc::new(AccountService::new(
        store.clone(),
        store.clone(),
        Arc::new(Argon2PasswordHasher::new()),
        images.clone(),
    ));
    let recipes = Arc::new(RecipeService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        images,
        Arc::new(DefaultClock),
    ));
    let subscriptions = Arc::new(SubscriptionService::new(
        store.clone(),
        store.clone(),
        store.clone(),
    ));
    let ports = HttpStatePorts {
        login: accounts.clone(),
        accounts: accounts.clone(),
        users: accounts,
        catalogue: Arc::new(CatalogueService::new(store.clone())),
        recipes: recipes.clone(),
        recipes_query: recipes,
        memberships: Arc::new(MembershipService::new(store.clone(), store.clone())),
        subscriptions: subscriptions.clone(),
        subscriptions_query: subscriptions,
        shopping_list: Arc::new(ShoppingListService::new(
            store.clone(),
            Arc::new(DocumentRenderer::new(RenderConfig::default())),
        )),
        short_links: Arc::new(ShortLinkService::new(store)),
    };
    let base_url = Url::parse("http://foodgram.test/").expect("base url");
    web::Data::new(HttpState::new(ports, base_url))
}

/// Initialise the full application against `store`, with media under
/// `media`.
pub async fn init_app(
    store: Arc<MemoryStore>,
    media: &TempDir,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    test::init_service(
        App::new()
            .app_data(http_state(store, media))
            .wrap(Trace)
            .service(
                web::scope("/api")
                    .wrap(session)
                    .app_data(json_config())
                    .app_data(query_config())
                    .service(login)
                    .service(logout)
                    .service(list_users)
                    .service(register)
                    .service(current_user)
                    .service(list_subscriptions)
                    .service(set_password)
                    .service(get_avatar)
                    .service(put_avatar)
                    .service(delete_avatar)
                    .service(get_user)
                    .service(subscribe)
                    .service(get_subscription)
                    .service(unsubscribe)
                    .service(list_tags)
                    .service(get_tag)
                    .service(list_ingredients)
                    .service(get_ingredient)
                    .service(download_shopping_cart)
                    .service(list_recipes)
                    .service(create_recipe)
                    .service(get_recipe)
                    .service(update_recipe)
                    .service(delete_recipe)
                    .service(add_favorite)
                    .service(remove_favorite)
                    .service(add_to_cart)
                    .service(remove_from_cart)
                    .service(get_link),
            )
            .service(follow_link),
    )
    .await
}

/// Register `username` and return the new user's id.
pub async fn register_user<S>(app: &S, username: &str) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({
                "email": format!("{username}@example.com"),
                "username": username,
                "first_name": "Test",
                "last_name": "Cook",
                "password": PASSWORD,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status().as_u16(), 201, "registering {username}");
    let body: Value = test::read_body_json(response).await;
    body["id"].as_str().expect("id").to_owned()
}

/// Log in as `username` and return the session cookie.
pub async fn login_as<S>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({
                "email": format!("{username}@example.com"),
                "password": password,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status().as_u16(), 204, "logging in {username}");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

/// Create a pancake recipe as the cookie's owner and return its id.
pub async fn create_pancakes<S>(app: &S, cookie: &Cookie<'static>) -> i64
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/recipes")
            .cookie(cookie.clone())
            .set_json(json!({
                "name": "Pancakes",
                "text": "Mix and fry.",
                "cooking_time": 20,
                "image": PIXEL,
                "tags": [1],
                "ingredients": [{"id": 1, "amount": 200}],
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status().as_u16(), 201, "creating pancakes");
    let body: Value = test::read_body_json(response).await;
    body["id"].as_i64().expect("recipe id")
}
