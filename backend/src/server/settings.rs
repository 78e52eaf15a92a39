//! Process settings loaded via OrthoConfig.
//!
//! Every field can come from the command line, a configuration file or a
//! `FOODGRAM_*` environment variable (for example `FOODGRAM_DATABASE_URL`).

use std::net::SocketAddr;
use std::path::PathBuf;

use foodgram::inbound::http::session_config::SessionToggles;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
const DEFAULT_MEDIA_ROOT: &str = "media";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Invalid or missing settings detected after loading.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required setting: {name}")]
    Missing { name: &'static str },
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid base url '{value}': {source}")]
    BaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("db_max_connections must be at least 1")]
    PoolSize,
}

/// Settings for the Foodgram API process.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FOODGRAM")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Public origin used for short links and media URLs.
    pub base_url: Option<String>,
    /// Directory holding uploaded images.
    pub media_root: Option<PathBuf>,
    /// Path to the cookie signing key.
    pub session_key_file: Option<PathBuf>,
    /// Allow a generated key when the key file is missing (debug builds).
    pub session_allow_ephemeral: Option<bool>,
    pub cookie_secure: Option<bool>,
    /// `lax`, `strict` or `none`.
    pub same_site: Option<String>,
    /// TrueType font used by PDF exports.
    pub pdf_font_path: Option<PathBuf>,
    pub shopping_list_title: Option<String>,
    pub db_max_connections: Option<u32>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(SettingsError::Missing {
                name: "database_url",
            })
    }

    /// Public origin, always ending in `/` so relative joins append.
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL).trim();
        let normalised = if raw.ends_with('/') {
            raw.to_owned()
        } else {
            format!("{raw}/")
        };
        Url::parse(&normalised).map_err(|source| SettingsError::BaseUrl {
            value: raw.to_owned(),
            source,
        })
    }

    pub fn media_root(&self) -> PathBuf {
        self.media_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_ROOT))
    }

    pub fn db_max_connections(&self) -> Result<u32, SettingsError> {
        match self.db_max_connections {
            None => Ok(DEFAULT_DB_MAX_CONNECTIONS),
            Some(0) => Err(SettingsError::PoolSize),
            Some(size) => Ok(size),
        }
    }

    pub fn session_toggles(&self) -> SessionToggles {
        SessionToggles {
            key_file: self.session_key_file.clone(),
            cookie_secure: self.cookie_secure,
            same_site: self.same_site.clone(),
            allow_ephemeral: self.session_allow_ephemeral,
        }
    }
}
