//! Port for recipe short-code storage.

use async_trait::async_trait;

use crate::domain::{RecipeId, ShortCode};

use super::define_port_error;

define_port_error! {
    /// Errors raised by short-link repository adapters.
    pub enum ShortLinkRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "short link repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "short link repository query failed: {message}",
        /// Another recipe already carries the code.
        CodeTaken => "short code is already in use",
    }
}

/// Short-code state of one recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortCodeLookup {
    MissingRecipe,
    Unassigned,
    Assigned(ShortCode),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortLinkRepository: Send + Sync {
    async fn lookup(&self, recipe: RecipeId) -> Result<ShortCodeLookup, ShortLinkRepositoryError>;

    /// Whether any recipe already uses `code`.
    async fn code_in_use(&self, code: &ShortCode) -> Result<bool, ShortLinkRepositoryError>;

    /// Store `code` unless the recipe already has one, then return the code
    /// the recipe carries afterwards. A unique violation surfaces as
    /// [`ShortLinkRepositoryError::CodeTaken`].
    async fn assign_if_absent(
        &self,
        recipe: RecipeId,
        code: &ShortCode,
    ) -> Result<ShortCodeLookup, ShortLinkRepositoryError>;

    async fn resolve(&self, code: &ShortCode) -> Result<Option<RecipeId>, ShortLinkRepositoryError>;
}
