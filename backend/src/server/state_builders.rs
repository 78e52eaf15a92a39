//! Wiring of Diesel repositories, outbound adapters and domain services into
//! the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use foodgram::domain::{
    AccountService, CatalogueService, MembershipService, RecipeService, ShoppingListService,
    ShortLinkService, SubscriptionService,
};
use foodgram::inbound::http::state::{HttpState, HttpStatePorts};
use foodgram::outbound::crypto::Argon2PasswordHasher;
use foodgram::outbound::export::DocumentRenderer;
use foodgram::outbound::media::{CapStdImageStore, MediaRootError};
use foodgram::outbound::persistence::{
    DieselCatalogueRepository, DieselMembershipRepository, DieselRecipeRepository,
    DieselShoppingListRepository, DieselShortLinkRepository, DieselSubscriptionRepository,
    DieselUserRepository,
};

use super::ServerConfig;

/// Repository adapters sharing one pool.
struct Repositories {
    users: Arc<DieselUserRepository>,
    catalogue: Arc<DieselCatalogueRepository>,
    recipes: Arc<DieselRecipeRepository>,
    memberships: Arc<DieselMembershipRepository>,
    subscriptions: Arc<DieselSubscriptionRepository>,
    shopping_list: Arc<DieselShoppingListRepository>,
    short_links: Arc<DieselShortLinkRepository>,
}

impl Repositories {
    fn new(config: &ServerConfig) -> Self {
        let pool = &config.db_pool;
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            catalogue: Arc::new(DieselCatalogueRepository::new(pool.clone())),
            recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
            memberships: Arc::new(DieselMembershipRepository::new(pool.clone())),
            subscriptions: Arc::new(DieselSubscriptionRepository::new(pool.clone())),
            shopping_list: Arc::new(DieselShoppingListRepository::new(pool.clone())),
            short_links: Arc::new(DieselShortLinkRepository::new(pool.clone())),
        }
    }
}

/// Build the HTTP state. Fails only when the media root cannot be opened.
pub(crate) fn build_http_state(
    config: &ServerConfig,
) -> Result<web::Data<HttpState>, MediaRootError> {
    let repos = Repositories::new(config);
    let images = Arc::new(CapStdImageStore::open(&config.media_root)?);
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let renderer = Arc::new(DocumentRenderer::new(config.render.clone()));

    let accounts = Arc::new(AccountService::new(
        repos.users.clone(),
        repos.subscriptions.clone(),
        hasher,
        images.clone(),
    ));
    let recipes = Arc::new(RecipeService::new(
        repos.recipes.clone(),
        repos.memberships.clone(),
        repos.subscriptions.clone(),
        images,
        Arc::new(DefaultClock),
    ));
    let subscriptions = Arc::new(SubscriptionService::new(
        repos.users,
        repos.subscriptions,
        repos.recipes.clone(),
    ));

    let ports = HttpStatePorts {
        login: accounts.clone(),
        accounts: accounts.clone(),
        users: accounts,
        catalogue: Arc::new(CatalogueService::new(repos.catalogue)),
        recipes: recipes.clone(),
        recipes_query: recipes,
        memberships: Arc::new(MembershipService::new(repos.recipes, repos.memberships)),
        subscriptions: subscriptions.clone(),
        subscriptions_query: subscriptions,
        shopping_list: Arc::new(ShoppingListService::new(repos.shopping_list, renderer)),
        short_links: Arc::new(ShortLinkService::new(repos.short_links)),
    };
    Ok(web::Data::new(HttpState::new(ports, config.base_url.clone())))
}
