//! Foodgram API entry point: loads settings, prepares the database and
//! serves HTTP until shutdown.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use foodgram::inbound::http::health::HealthState;
use foodgram::inbound::http::session_config::{BuildMode, session_settings};
use foodgram::outbound::export::RenderConfig;
use foodgram::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{AppSettings, ServerConfig, create_server};

fn io_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {err}"))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load_from_iter(std::env::args_os()).map_err(|err| io_error("settings", err))?;
    let session = session_settings(&settings.session_toggles(), BuildMode::from_debug_assertions())
        .map_err(|err| io_error("session configuration", err))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| io_error("settings", err))?;
    let base_url = settings.base_url().map_err(|err| io_error("settings", err))?;
    let database_url = settings
        .database_url()
        .map_err(|err| io_error("settings", err))?;
    let max_connections = settings
        .db_max_connections()
        .map_err(|err| io_error("settings", err))?;
    let render = RenderConfig::load(
        settings.shopping_list_title.as_deref(),
        settings.pdf_font_path.as_deref(),
    )
    .map_err(|err| io_error("render configuration", err))?;
    if render.font().is_none() {
        warn!("no PDF font configured; PDF shopping lists are unavailable");
    }

    let pool_config = PoolConfig::new(database_url).with_max_size(max_connections);
    info!(config = ?pool_config, "connecting to database");
    let pool = DbPool::new(pool_config)
        .await
        .map_err(|err| io_error("database pool", err))?;
    run_migrations(&pool)
        .await
        .map_err(|err| io_error("database migrations", err))?;

    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        pool,
        base_url,
    )
    .with_media_root(settings.media_root())
    .with_render_config(render);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "foodgram listening");
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome
}
