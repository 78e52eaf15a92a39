//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::{AppSettings, SettingsError};

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use foodgram::Trace;
use foodgram::inbound::http::auth::{login, logout};
use foodgram::inbound::http::catalogue::{get_ingredient, get_tag, list_ingredients, list_tags};
use foodgram::inbound::http::health::{HealthState, live, ready};
use foodgram::inbound::http::membership::{
    add_favorite, add_to_cart, remove_favorite, remove_from_cart,
};
use foodgram::inbound::http::recipes::{
    create_recipe, delete_recipe, get_recipe, list_recipes, update_recipe,
};
use foodgram::inbound::http::shopping_list::download_shopping_cart;
use foodgram::inbound::http::short_links::{follow_link, get_link};
use foodgram::inbound::http::state::HttpState;
use foodgram::inbound::http::subscriptions::{
    get_subscription, list_subscriptions, subscribe, unsubscribe,
};
use foodgram::inbound::http::users::{
    current_user, delete_avatar, get_avatar, get_user, list_users, put_avatar, register,
    set_password,
};
use foodgram::inbound::http::validation::{json_config, query_config};

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::days(14)),
        )
        .build();

    // Literal segments are registered ahead of `{id}` patterns that would
    // otherwise capture them.
    let api = web::scope("/api")
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
        .service(get_link);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(follow_link)
        .service(ready)
        .service(live)
}

/// Construct an Actix HTTP server from `config`, marking `health_state`
/// ready once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when the media root cannot be opened or the
/// socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config).map_err(std::io::Error::other)?;
    let server_health_state = health_state.clone();
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        ..
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
