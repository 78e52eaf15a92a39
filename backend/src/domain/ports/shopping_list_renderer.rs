//! Port for turning a shopping list into a downloadable document.

use crate::domain::{ExportFormat, ShoppingList};

use super::define_port_error;

define_port_error! {
    /// Errors raised while rendering a shopping list.
    pub enum RenderError {
        /// The requested format cannot be produced with the current
        /// configuration.
        Unavailable { message: String } => "renderer unavailable: {message}",
        /// Rendering failed.
        Render { message: String } => "rendering failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait ShoppingListRenderer: Send + Sync {
    /// Render the list as a complete document in `format`.
    fn render(&self, list: &ShoppingList, format: ExportFormat) -> Result<Vec<u8>, RenderError>;
}
