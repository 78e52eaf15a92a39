//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use url::Url;

use crate::domain::ports::{
    AccountCommand, CatalogueQuery, LoginService, MembershipCommand, RecipesCommand,
    RecipesQuery, ShoppingListExport, ShortLinks, SubscriptionsCommand, SubscriptionsQuery,
    UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub recipes: Arc<dyn RecipesCommand>,
    pub recipes_query: Arc<dyn RecipesQuery>,
    pub memberships: Arc<dyn MembershipCommand>,
    pub subscriptions: Arc<dyn SubscriptionsCommand>,
    pub subscriptions_query: Arc<dyn SubscriptionsQuery>,
    pub shopping_list: Arc<dyn ShoppingListExport>,
    pub short_links: Arc<dyn ShortLinks>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub recipes: Arc<dyn RecipesCommand>,
    pub recipes_query: Arc<dyn RecipesQuery>,
    pub memberships: Arc<dyn MembershipCommand>,
    pub subscriptions: Arc<dyn SubscriptionsCommand>,
    pub subscriptions_query: Arc<dyn SubscriptionsQuery>,
    pub shopping_list: Arc<dyn ShoppingListExport>,
    pub short_links: Arc<dyn ShortLinks>,
    /// Public origin used to build absolute links (short links, media URLs).
    pub base_url: Url,
}

impl HttpState {
    /// Construct state from the ports bundle and the public base URL.
    pub fn new(ports: HttpStatePorts, base_url: Url) -> Self {
        let HttpStatePorts {
            login,
            accounts,
            users,
            catalogue,
            recipes,
            recipes_query,
            memberships,
            subscriptions,
            subscriptions_query,
            shopping_list,
            short_links,
        } = ports;
        Self {
            login,
            accounts,
            users,
            catalogue,
            recipes,
            recipes_query,
            memberships,
            subscriptions,
            subscriptions_query,
            shopping_list,
            short_links,
            base_url,
        }
    }

    /// Absolute URL for `path` under the public origin.
    ///
    /// # Examples
    /// ```ignore
    /// let link = state.absolute_url("s/aB3");
    /// assert_eq!(link, "https://foodgram.example/s/aB3");
    /// ```
    pub fn absolute_url(&self, path: &str) -> String {
        let trimmed = path.trim_start_matches('/');
        match self.base_url.join(trimmed) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}/{trimmed}", self.base_url.as_str().trim_end_matches('/')),
        }
    }

    /// Public URL of a stored media file.
    pub fn media_url(&self, relative: &str) -> String {
        self.absolute_url(&format!("media/{}", relative.trim_start_matches('/')))
    }
}
