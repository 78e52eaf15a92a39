//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, stores, hashers, renderers) are implemented by
//! outbound adapters. Driving ports (commands and queries) are implemented by
//! domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod catalogue_query;
mod catalogue_repository;
mod image_store;
mod login_service;
mod membership_command;
mod membership_repository;
mod password_hasher;
mod recipe_repository;
mod recipes_command;
mod recipes_query;
mod shopping_list_export;
mod shopping_list_renderer;
mod shopping_list_repository;
mod short_link_repository;
mod short_links;
mod subscription_repository;
mod subscriptions_command;
mod subscriptions_query;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
pub use catalogue_query::CatalogueQuery;
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{CatalogueRepository, CatalogueRepositoryError};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageCategory, ImageStore, ImageStoreError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use membership_command::MockMembershipCommand;
pub use membership_command::MembershipCommand;
#[cfg(test)]
pub use membership_repository::MockMembershipRepository;
pub use membership_repository::{MembershipRepository, MembershipRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{
    RecipeOwnership, RecipePersistenceError, RecipeRepository, RecipeWrite,
};
#[cfg(test)]
pub use recipes_command::MockRecipesCommand;
pub use recipes_command::RecipesCommand;
#[cfg(test)]
pub use recipes_query::MockRecipesQuery;
pub use recipes_query::RecipesQuery;
#[cfg(test)]
pub use shopping_list_export::MockShoppingListExport;
pub use shopping_list_export::{ExportedFile, ShoppingListExport};
#[cfg(test)]
pub use shopping_list_renderer::MockShoppingListRenderer;
pub use shopping_list_renderer::{RenderError, ShoppingListRenderer};
#[cfg(test)]
pub use shopping_list_repository::MockShoppingListRepository;
pub use shopping_list_repository::{ShoppingListRepository, ShoppingListRepositoryError};
#[cfg(test)]
pub use short_link_repository::MockShortLinkRepository;
pub use short_link_repository::{ShortCodeLookup, ShortLinkRepository, ShortLinkRepositoryError};
#[cfg(test)]
pub use short_links::MockShortLinks;
pub use short_links::ShortLinks;
#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
pub use subscription_repository::{SubscriptionRepository, SubscriptionRepositoryError};
#[cfg(test)]
pub use subscriptions_command::MockSubscriptionsCommand;
pub use subscriptions_command::SubscriptionsCommand;
#[cfg(test)]
pub use subscriptions_query::MockSubscriptionsQuery;
pub use subscriptions_query::SubscriptionsQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredCredentials, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
