//! Port for the shopping-list aggregation query.

use async_trait::async_trait;

use crate::domain::{ShoppingItem, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised while aggregating a cart.
    pub enum ShoppingListRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "shopping list connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } => "shopping list query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShoppingListRepository: Send + Sync {
    /// Ingredient totals of every recipe in the user's cart, grouped by
    /// `(name, unit)`.
    async fn cart_totals(
        &self,
        user: &UserId,
    ) -> Result<Vec<ShoppingItem>, ShoppingListRepositoryError>;
}
