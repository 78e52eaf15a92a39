//! Uploaded images transmitted as base64 data URLs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Largest decoded image accepted, in bytes.
pub const IMAGE_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Reasons an image payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageValidationError {
    #[error("image must not be empty")]
    Empty,
    #[error("image must be a data URL such as data:image/png;base64,...")]
    NotDataUrl,
    #[error("unsupported image type {mime}")]
    UnsupportedType { mime: String },
    #[error("image is not valid base64")]
    InvalidBase64,
    #[error("image exceeds {max} bytes")]
    TooLarge { max: usize },
}

/// Image format accepted for recipes and avatars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    fn from_mime(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// File extension used when the image is stored.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

/// Decoded image bytes ready to be stored.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Decode a `data:image/<type>;base64,<payload>` string.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{ImageFormat, ImageUpload};
    ///
    /// let image = ImageUpload::from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
    /// assert_eq!(image.format(), ImageFormat::Png);
    /// ```
    pub fn from_data_url(raw: &str) -> Result<Self, ImageValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ImageValidationError::Empty);
        }
        let rest = trimmed
            .strip_prefix("data:")
            .ok_or(ImageValidationError::NotDataUrl)?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or(ImageValidationError::NotDataUrl)?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or(ImageValidationError::NotDataUrl)?;
        let format =
            ImageFormat::from_mime(mime).ok_or_else(|| ImageValidationError::UnsupportedType {
                mime: mime.to_owned(),
            })?;
        if payload.is_empty() {
            return Err(ImageValidationError::Empty);
        }
        let bytes = STANDARD
            .decode(payload)
            .map_err(|_| ImageValidationError::InvalidBase64)?;
        Self::from_bytes(format, bytes)
    }

    /// Wrap raw bytes, enforcing the size limit.
    pub fn from_bytes(format: ImageFormat, bytes: Vec<u8>) -> Result<Self, ImageValidationError> {
        if bytes.is_empty() {
            return Err(ImageValidationError::Empty);
        }
        if bytes.len() > IMAGE_MAX_BYTES {
            return Err(ImageValidationError::TooLarge {
                max: IMAGE_MAX_BYTES,
            });
        }
        Ok(Self { format, bytes })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
