//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Uniqueness, foreign-key and check constraints do the
//!   arbitration; adapters map their violations to typed port errors.
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   (`schema.rs`) never leave this module.
//! - **Embedded migrations**: `run_migrations` applies `backend/migrations`
//!   at startup.
//!
//! # Example
//!
//! ```ignore
//! use foodgram::outbound::persistence::{DbPool, DieselRecipeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/foodgram")).await?;
//! run_migrations(&pool).await?;
//! let recipes = DieselRecipeRepository::new(pool);
//! ```

mod diesel_catalogue_repository;
mod diesel_helpers;
mod diesel_membership_repository;
mod diesel_recipe_repository;
mod diesel_shopping_list_repository;
mod diesel_short_link_repository;
mod diesel_subscription_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_membership_repository::DieselMembershipRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_shopping_list_repository::DieselShoppingListRepository;
pub use diesel_short_link_repository::DieselShortLinkRepository;
pub use diesel_subscription_repository::DieselSubscriptionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DEFAULT_MAX_SIZE, DbPool, PoolConfig, PoolError};
