//! Port for storing decoded image uploads.

use async_trait::async_trait;

use crate::domain::ImageUpload;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ImageStoreError {
        /// Writing or deleting the file failed.
        Io { message: String } => "image store failed: {message}",
    }
}

/// Directory an image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCategory {
    RecipeImage,
    Avatar,
}

impl ImageCategory {
    /// Media-relative directory for this category.
    pub fn directory(self) -> &'static str {
        match self {
            Self::RecipeImage => "recipes/images",
            Self::Avatar => "users/avatars",
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist the image under a generated name and return its media-relative
    /// path.
    async fn store(
        &self,
        category: ImageCategory,
        image: &ImageUpload,
    ) -> Result<String, ImageStoreError>;

    /// Delete a stored image. Missing files are not an error.
    async fn remove(&self, path: &str) -> Result<(), ImageStoreError>;
}
