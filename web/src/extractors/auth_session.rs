use crate::error::Error;
use crate::extractors::RejectionType;
use axum::{extract::FromRequestParts, http::request::Parts};
use domain::UserRecord;
use tower_sessions::Session;

const USER_KEY: &str = "user";
const CODE_VERIFIER_KEY: &str = "code_verifier";

/// Typed view of the browser session.
///
/// The session holds exactly two entries: the `user` record and, between starting a
/// flow and its callback, the PKCE `code_verifier`. The verifier never leaves the
/// server; the browser only carries the session id cookie.
pub(crate) struct AuthSession(Session);

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(status, msg)| (status, msg.to_string()))?;
        Ok(AuthSession(session))
    }
}

impl AuthSession {
    /// The stored user record, `None` when the session never had one or it was removed.
    pub(crate) async fn user(&self) -> Result<Option<UserRecord>, Error> {
        self.0.get(USER_KEY).await.map_err(Error::session)
    }

    pub(crate) async fn set_user(&self, user: &UserRecord) -> Result<(), Error> {
        self.0.insert(USER_KEY, user).await.map_err(Error::session)
    }

    /// Stores an authenticated user under a fresh session id.
    pub(crate) async fn login(&self, user: UserRecord) -> Result<(), Error> {
        self.0.cycle_id().await.map_err(Error::session)?;
        self.set_user(&user).await
    }

    pub(crate) async fn remove_user(&self) -> Result<(), Error> {
        self.0
            .remove::<UserRecord>(USER_KEY)
            .await
            .map(|_| ())
            .map_err(Error::session)
    }

    pub(crate) async fn set_code_verifier(&self, code_verifier: &str) -> Result<(), Error> {
        self.0
            .insert(CODE_VERIFIER_KEY, code_verifier)
            .await
            .map_err(Error::session)
    }

    /// Removes and returns the pending verifier; each verifier is redeemable once.
    pub(crate) async fn take_code_verifier(&self) -> Result<Option<String>, Error> {
        self.0
            .remove::<String>(CODE_VERIFIER_KEY)
            .await
            .map_err(Error::session)
    }
}
