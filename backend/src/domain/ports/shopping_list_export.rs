//! Driving port for the shopping-list download.

use async_trait::async_trait;

use crate::domain::{Error, ExportFormat, UserId};

/// Rendered shopping list ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShoppingListExport: Send + Sync {
    /// Aggregate the user's cart and render it. An empty cart still yields
    /// a complete document.
    async fn export(&self, user: &UserId, format: ExportFormat) -> Result<ExportedFile, Error>;
}
