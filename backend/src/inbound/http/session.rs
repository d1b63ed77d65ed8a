//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting or requiring the
//! authenticated client id.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{ClientId, Error};

pub(crate) const CLIENT_ID_KEY: &str = "client_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated client's id in the session cookie.
    pub fn persist_client(&self, client_id: ClientId) -> Result<(), Error> {
        self.0
            .insert(CLIENT_ID_KEY, client_id.get())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current client id from the session, if present.
    pub fn client_id(&self) -> Result<Option<ClientId>, Error> {
        let id = self
            .0
            .get::<i64>(CLIENT_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match ClientId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid client id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an authenticated client id or return `401 Unauthorized`.
    pub fn require_client(&self) -> Result<ClientId, Error> {
        self.client_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop all session state, ending the login.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
