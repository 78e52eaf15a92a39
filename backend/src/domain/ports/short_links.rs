//! Driving port for recipe short links.

use async_trait::async_trait;

use crate::domain::{Error, RecipeId, ShortCode};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortLinks: Send + Sync {
    /// Return the recipe's code, assigning one on first use.
    async fn ensure_short_link(&self, recipe: RecipeId) -> Result<ShortCode, Error>;

    /// Recipe carrying `code`; `not_found` when none does.
    async fn resolve_short_link(&self, code: &str) -> Result<RecipeId, Error>;
}
