//! Shopping-list export service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::domain::ports::{
    ExportedFile, ShoppingListExport, ShoppingListRenderer, ShoppingListRepository,
    ShoppingListRepositoryError,
};
use crate::domain::{Error, ExportFormat, ShoppingList, UserId};

/// Aggregates a user's cart and renders it with the configured renderer.
#[derive(Clone)]
pub struct ShoppingListService<L, R> {
    repository: Arc<L>,
    renderer: Arc<R>,
}

impl<L, R> ShoppingListService<L, R> {
    pub fn new(repository: Arc<L>, renderer: Arc<R>) -> Self {
        Self {
            repository,
            renderer,
        }
    }
}

fn map_repository_error(error: ShoppingListRepositoryError) -> Error {
    match error {
        ShoppingListRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("shopping list repository unavailable: {message}"))
        }
        ShoppingListRepositoryError::Query { message } => {
            Error::internal(format!("shopping list repository error: {message}"))
        }
    }
}

#[async_trait]
impl<L, R> ShoppingListExport for ShoppingListService<L, R>
where
    L: ShoppingListRepository,
    R: ShoppingListRenderer,
{
    async fn export(&self, user: &UserId, format: ExportFormat) -> Result<ExportedFile, Error> {
        let rows = self
            .repository
            .cart_totals(user)
            .await
            .map_err(map_repository_error)?;
        let list = ShoppingList::aggregate(rows);
        let bytes = self.renderer.render(&list, format).map_err(|err| {
            error!(error = %err, ?format, "shopping list rendering failed");
            Error::internal(err.to_string())
        })?;
        Ok(ExportedFile {
            file_name: format.file_name(),
            content_type: format.content_type(),
            bytes,
        })
    }
}
