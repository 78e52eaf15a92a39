//! HTTP server configuration object.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use foodgram::outbound::export::RenderConfig;
use foodgram::outbound::persistence::DbPool;
use url::Url;

/// Everything `create_server` needs, resolved from settings at startup.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) base_url: Url,
    pub(crate) media_root: PathBuf,
    pub(crate) render: RenderConfig,
}

impl ServerConfig {
    /// Construct a configuration with default media root, base URL and
    /// render settings.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        db_pool: DbPool,
        base_url: Url,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool,
            base_url,
            media_root: PathBuf::from("media"),
            render: RenderConfig::default(),
        }
    }

    #[must_use]
    pub fn with_media_root(mut self, media_root: impl Into<PathBuf>) -> Self {
        self.media_root = media_root.into();
        self
    }

    #[must_use]
    pub fn with_render_config(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }
}
