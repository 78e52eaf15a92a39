//! Image storage on the local filesystem.
//!
//! Uploads are written beneath the media root through a capability handle
//! (`cap_std::fs::Dir`), so a stored or removed path can never escape it.

mod cap_std_image_store;

pub use cap_std_image_store::{CapStdImageStore, MediaRootError};
