//! `ImageStore` adapter writing decoded uploads under a media root.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ImageUpload;
use crate::domain::ports::{ImageCategory, ImageStore, ImageStoreError};

/// Failure to open the media root at startup.
#[derive(Debug, thiserror::Error)]
#[error("failed to open media root {path}: {source}")]
pub struct MediaRootError {
    path: PathBuf,
    #[source]
    source: io::Error,
}

/// Image store rooted at a media directory.
#[derive(Clone)]
pub struct CapStdImageStore {
    root: Arc<Dir>,
}

impl CapStdImageStore {
    /// Open (creating if needed) the media root.
    pub fn open(media_root: impl AsRef<Path>) -> Result<Self, MediaRootError> {
        let path = media_root.as_ref();
        let wrap = |source| MediaRootError {
            path: path.to_path_buf(),
            source,
        };
        Dir::create_ambient_dir_all(path, ambient_authority()).map_err(wrap)?;
        let root = Dir::open_ambient_dir(path, ambient_authority()).map_err(wrap)?;
        Ok(Self {
            root: Arc::new(root),
        })
    }
}

fn io_error(context: &str, error: &io::Error) -> ImageStoreError {
    ImageStoreError::io(format!("{context}: {error}"))
}

fn write_image(root: &Dir, directory: &str, file: &str, bytes: &[u8]) -> io::Result<()> {
    root.create_dir_all(directory)?;
    root.write(Path::new(directory).join(file), bytes)
}

fn remove_image(root: &Dir, path: &str) -> io::Result<()> {
    match root.remove_file(path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[async_trait]
impl ImageStore for CapStdImageStore {
    async fn store(
        &self,
        category: ImageCategory,
        image: &ImageUpload,
    ) -> Result<String, ImageStoreError> {
        let directory = category.directory();
        let file = format!("{}.{}", Uuid::new_v4().simple(), image.format().extension());
        let relative = format!("{directory}/{file}");
        let root = Arc::clone(&self.root);
        let bytes = image.bytes().to_vec();
        tokio::task::spawn_blocking(move || write_image(&root, directory, &file, &bytes))
            .await
            .map_err(|err| ImageStoreError::io(format!("image write task failed: {err}")))?
            .map_err(|err| io_error("write image", &err))?;
        debug!(path = %relative, "stored image");
        Ok(relative)
    }

    async fn remove(&self, path: &str) -> Result<(), ImageStoreError> {
        let root = Arc::clone(&self.root);
        let owned = path.to_owned();
        tokio::task::spawn_blocking(move || remove_image(&root, &owned))
            .await
            .map_err(|err| ImageStoreError::io(format!("image remove task failed: {err}")))?
            .map_err(|err| io_error("remove image", &err))
    }
}
