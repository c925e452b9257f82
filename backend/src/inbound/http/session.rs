//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie only carries the account id. Every authenticated request
//! reloads the account so role changes and deletions take effect at once; a
//! session pointing at a deleted account is purged and treated as anonymous.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::{info, warn};

use crate::domain::{Account, AccountId, AccountService, Caller, Error};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Bind the session to `account_id`, rotating the session first.
    pub fn persist_account(&self, account_id: &AccountId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, account_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current account id from the session, if present.
    pub fn account_id(&self) -> Result<Option<AccountId>, Error> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match raw.parse::<AccountId>() {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    warn!("invalid account id in session cookie: {error}");
                    self.clear();
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an account id or return `401 Unauthorized`.
    pub fn require_account_id(&self) -> Result<AccountId, Error> {
        self.account_id()?.ok_or_else(login_required)
    }

    /// Drop all session state; the cookie is removed on the response.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Reload the account behind the session or return `401 Unauthorized`.
    pub async fn require_account(&self, accounts: &AccountService) -> Result<Account, Error> {
        let id = self.require_account_id()?;
        match accounts.resolve_account(&id).await? {
            Some(account) => Ok(account),
            None => Err(self.stale(id)),
        }
    }

    /// Like [`SessionContext::require_account`] but returns only the identity.
    pub async fn require_caller(&self, accounts: &AccountService) -> Result<Caller, Error> {
        let id = self.require_account_id()?;
        match accounts.resolve_caller(&id).await? {
            Some(caller) => Ok(caller),
            None => Err(self.stale(id)),
        }
    }

    fn stale(&self, id: AccountId) -> Error {
        info!(account_id = %id, "session refers to a deleted account; purging");
        self.clear();
        login_required()
    }
}

fn login_required() -> Error {
    Error::unauthorized("login required")
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
