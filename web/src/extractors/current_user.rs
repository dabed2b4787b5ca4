use crate::extractors::auth_session::AuthSession;
use crate::extractors::RejectionType;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use domain::UserRecord;
use log::*;

/// The user of the current request, loaded from the session before the handler runs.
///
/// Never rejects for lack of a login: a session without a user record, or with the
/// unauthenticated marker, yields `UserRecord::Unauthenticated`.
pub(crate) struct CurrentUser(pub UserRecord);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = AuthSession::from_request_parts(parts, state).await?;

        match session.user().await {
            Ok(user) => Ok(CurrentUser(user.unwrap_or_default())),
            Err(e) => {
                warn!("Failed to load user from session: {:?}", e);
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL SERVER ERROR".to_string(),
                ))
            }
        }
    }
}
