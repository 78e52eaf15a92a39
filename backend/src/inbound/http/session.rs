//! Cookie-session identity for HTTP handlers.
//!
//! Login stores the user's id in a private cookie session. Open reads ask for
//! the optional *viewer*; writes ask for the required *caller*.

use actix_session::{Session, SessionGetError};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Session handle exposing only the identity operations handlers need.
#[derive(Clone)]
pub struct SessionContext(Session);

fn read_failure(error: SessionGetError) -> Error {
    Error::internal(format!("failed to read session: {error}"))
}

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Sign `user_id` in; the cookie is rewritten on the response.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop every session entry and expire the cookie.
    pub fn forget_user(&self) {
        self.0.purge();
    }

    /// The signed-in viewer, if any. An id that no longer parses counts as
    /// anonymous.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let Some(raw) = self.0.get::<String>(USER_ID_KEY).map_err(read_failure)? else {
            return Ok(None);
        };
        Ok(UserId::new(&raw)
            .inspect_err(|error| warn!(%error, "discarding malformed session user id"))
            .ok())
    }

    /// The signed-in caller, or `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("authentication credentials were not provided"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        Session::from_request(req, payload)
            .map(|session| session.map(Self::new))
            .boxed_local()
    }
}
