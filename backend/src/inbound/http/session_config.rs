//! Session configuration validation.
//!
//! Cookie toggles arrive from the layered application settings; this module
//! turns them into a signing key and cookie policy, strict in release builds
//! and forgiving (with warnings) in debug builds.

use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

/// Default location of the session signing key.
pub const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
/// Shortest key file accepted in release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid session toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Raw session toggles as read from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionToggles {
    pub key_file: Option<PathBuf>,
    pub cookie_secure: Option<bool>,
    pub same_site: Option<String>,
    pub allow_ephemeral: Option<bool>,
}

/// Session settings derived from configuration toggles.
pub struct SessionSettings {
    /// Signing key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// Configured `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required setting is missing.
    #[error("missing required setting: {name}")]
    Missing { name: &'static str },
    /// A setting is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file exists but is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` requires a secure cookie in release builds.
    #[error("same_site=None requires cookie_secure=true")]
    InsecureSameSiteNone,
    /// Release builds must not allow ephemeral session keys.
    #[error("session_allow_ephemeral must be false in release builds")]
    EphemeralNotAllowed,
}

/// Validate `toggles` for `mode` and load the signing key.
///
/// # Examples
///
/// ```rust
/// use foodgram::inbound::http::session_config::{BuildMode, SessionToggles, session_settings};
///
/// let toggles = SessionToggles {
///     key_file: Some(std::env::temp_dir().join("foodgram-no-such-key")),
///     ..SessionToggles::default()
/// };
/// let settings = session_settings(&toggles, BuildMode::Debug).unwrap();
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings(
    toggles: &SessionToggles,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = cookie_secure(toggles, mode)?;
    let same_site = same_site(toggles, mode, cookie_secure)?;
    let allow_ephemeral = allow_ephemeral(toggles, mode)?;
    let key_path = toggles
        .key_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH));
    let key = session_key(&key_path, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn cookie_secure(toggles: &SessionToggles, mode: BuildMode) -> Result<bool, SessionConfigError> {
    match toggles.cookie_secure {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!("cookie_secure not set; defaulting to secure");
            Ok(true)
        }
        None => Err(SessionConfigError::Missing {
            name: "cookie_secure",
        }),
    }
}

fn same_site(
    toggles: &SessionToggles,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };

    let Some(value) = toggles.same_site.as_deref() else {
        return Ok(default_same_site);
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("same_site=None without secure cookies; browsers may reject the cookie");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid same_site, using default");
            Ok(default_same_site)
        }
        _ => Err(SessionConfigError::Invalid {
            name: "same_site",
            value: value.to_owned(),
            expected: SAMESITE_EXPECTED,
        }),
    }
}

fn allow_ephemeral(toggles: &SessionToggles, mode: BuildMode) -> Result<bool, SessionConfigError> {
    match toggles.allow_ephemeral {
        Some(true) if !mode.is_debug() => Err(SessionConfigError::EphemeralNotAllowed),
        Some(flag) => Ok(flag),
        None => Ok(false),
    }
}

fn session_key(
    path: &Path,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path: path.to_path_buf(),
            source: error,
        }),
    }
}
