//! Domain primitives, aggregates, ports and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, the ports through which adapters plug in, and the
//! services implementing the driving ports. Nothing here depends on HTTP or
//! SQL types.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, Recipe, Tag, Ingredient: core entities.
//! - ShoppingList: aggregated cart totals.
//! - ShortCode: compact recipe link code.

pub mod auth;
pub mod catalogue;
pub mod error;
pub mod image;
pub mod membership;
pub mod ports;
pub mod recipe;
pub mod shopping_list;
pub mod short_link;
pub mod subscription;
pub mod trace_id;
pub mod user;

mod account_service;
mod catalogue_service;
mod membership_service;
mod recipe_service;
mod shopping_list_service;
mod short_link_service;
mod subscription_service;

pub use self::account_service::AccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, NewPassword, PasswordHash, Registration,
    RegistrationField,
};
pub use self::catalogue::{Ingredient, IngredientId, IngredientSearch, Tag, TagId};
pub use self::catalogue_service::CatalogueService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::image::{ImageFormat, ImageUpload, ImageValidationError};
pub use self::membership::MembershipKind;
pub use self::membership_service::MembershipService;
pub use self::recipe::{
    FieldError, FieldErrors, Recipe, RecipeDraft, RecipeDraftInput, RecipeDraftMode,
    RecipeFilter, RecipeId, RecipeIngredientLine, RecipeListQuery, RecipeSummary, RecipeView,
    ViewerFlags,
};
pub use self::recipe_service::RecipeService;
pub use self::shopping_list::{ExportFormat, ShoppingItem, ShoppingList, UnknownExportFormat};
pub use self::shopping_list_service::ShoppingListService;
pub use self::short_link::{ShortCode, ShortCodeError};
pub use self::short_link_service::{SHORT_CODE_ATTEMPTS, ShortLinkService};
pub use self::subscription::{AuthorWithRecipes, RecipesLimit, RecipesLimitError};
pub use self::subscription_service::SubscriptionService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, PersonName, User, UserId, UserProfile, UserValidationError, Username,
    validate_username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use foodgram::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
