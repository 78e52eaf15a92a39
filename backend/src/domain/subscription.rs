//! Follow relationships between users.

use super::recipe::RecipeSummary;
use super::user::UserProfile;

/// Smallest accepted `recipes_limit`.
pub const RECIPES_LIMIT_MIN: i64 = 2;

/// Raised when `recipes_limit` is below [`RECIPES_LIMIT_MIN`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("recipes_limit must be at least {min}")]
pub struct RecipesLimitError {
    pub min: i64,
}

/// Optional cap on embedded recipe summaries per followed author.
///
/// # Examples
/// ```
/// use foodgram::domain::RecipesLimit;
///
/// assert_eq!(RecipesLimit::new(Some(3)).unwrap().get(), Some(3));
/// assert!(RecipesLimit::new(Some(1)).is_err());
/// assert_eq!(RecipesLimit::new(None).unwrap().get(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecipesLimit(Option<i64>);

impl RecipesLimit {
    /// Accept `None` or any value of at least [`RECIPES_LIMIT_MIN`].
    pub fn new(raw: Option<i64>) -> Result<Self, RecipesLimitError> {
        match raw {
            Some(value) if value < RECIPES_LIMIT_MIN => Err(RecipesLimitError {
                min: RECIPES_LIMIT_MIN,
            }),
            other => Ok(Self(other)),
        }
    }

    /// The cap, or `None` for every recipe.
    pub fn get(self) -> Option<i64> {
        self.0
    }
}

/// A followed author with a preview of their recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorWithRecipes {
    pub profile: UserProfile,
    /// Newest first, truncated to the requested limit.
    pub recipes: Vec<RecipeSummary>,
    /// Total number of recipes by the author.
    pub recipes_count: i64,
}
