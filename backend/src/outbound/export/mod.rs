//! Shopping-list document renderers.
//!
//! [`DocumentRenderer`] implements the renderer port for every
//! [`ExportFormat`](crate::domain::ExportFormat). Rendering is a pure function
//! of the list and a [`RenderConfig`] built once at startup.

mod config;
mod pdf;
mod text;

use crate::domain::ports::{RenderError, ShoppingListRenderer};
use crate::domain::{ExportFormat, ShoppingItem, ShoppingList};

pub use config::{PageGeometry, RenderConfig, RenderConfigError};

/// Notice rendered in place of items when the cart is empty.
pub const EMPTY_NOTICE: &str = "Your shopping cart is empty.";

/// One bulleted line for `item`.
pub(crate) fn item_line(item: &ShoppingItem) -> String {
    format!(
        "\u{2022} {} ({}) \u{2014} {}",
        item.name, item.measurement_unit, item.total
    )
}

/// Body lines shared by every format.
pub(crate) fn body_lines(list: &ShoppingList) -> Vec<String> {
    if list.is_empty() {
        return vec![EMPTY_NOTICE.to_owned()];
    }
    list.items().iter().map(item_line).collect()
}

/// Renderer dispatching on the requested format.
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    config: RenderConfig,
}

impl DocumentRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }
}

impl ShoppingListRenderer for DocumentRenderer {
    fn render(&self, list: &ShoppingList, format: ExportFormat) -> Result<Vec<u8>, RenderError> {
        match format {
            ExportFormat::Text => Ok(text::render(list, self.config.title()).into_bytes()),
            ExportFormat::Pdf => pdf::render(list, &self.config),
        }
    }
}
