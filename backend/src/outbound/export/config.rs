//! Render configuration built once at startup.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};

/// Default document title.
pub const DEFAULT_TITLE: &str = "Shopping list";

/// Failure to load the configured font.
#[derive(Debug, thiserror::Error)]
pub enum RenderConfigError {
    #[error("font path {path} has no file name")]
    NotAFile { path: PathBuf },
    #[error("failed to read font {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Page size, margins and type sizes for PDF output, in millimetres and
/// points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
    pub title_size_pt: f32,
    pub font_size_pt: f32,
    pub line_height_mm: f32,
}

impl Default for PageGeometry {
    /// A4 portrait.
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 20.0,
            title_size_pt: 18.0,
            font_size_pt: 12.0,
            line_height_mm: 7.0,
        }
    }
}

impl PageGeometry {
    /// Item lines that fit between the margins of a page.
    pub fn lines_per_page(&self) -> usize {
        let usable = self.height_mm - 2.0 * self.margin_mm;
        (usable / self.line_height_mm).floor().max(1.0) as usize
    }
}

/// Everything a renderer needs besides the list itself.
#[derive(Clone)]
pub struct RenderConfig {
    title: String,
    font: Option<Arc<[u8]>>,
    geometry: PageGeometry,
}

impl fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderConfig")
            .field("title", &self.title)
            .field("font_bytes", &self.font.as_ref().map(|font| font.len()))
            .field("geometry", &self.geometry)
            .finish()
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

impl RenderConfig {
    /// Configuration without a font; PDF export is unavailable until one is
    /// attached.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            font: None,
            geometry: PageGeometry::default(),
        }
    }

    /// Build from settings, reading the TrueType font when a path is given.
    pub fn load(
        title: Option<&str>,
        font_path: Option<&Path>,
    ) -> Result<Self, RenderConfigError> {
        let config = Self::new(title.unwrap_or(DEFAULT_TITLE));
        match font_path {
            Some(path) => Ok(config.with_font(read_font(path)?)),
            None => Ok(config),
        }
    }

    #[must_use]
    pub fn with_font(mut self, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.font = Some(bytes.into());
        self
    }

    #[must_use]
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn font(&self) -> Option<&[u8]> {
        self.font.as_deref()
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }
}

fn read_font(path: &Path) -> Result<Vec<u8>, RenderConfigError> {
    let file_name = path.file_name().ok_or_else(|| RenderConfigError::NotAFile {
        path: path.to_path_buf(),
    })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let read_error = |source| RenderConfigError::Read {
        path: path.to_path_buf(),
        source,
    };
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    directory.read(file_name).map_err(read_error)
}
