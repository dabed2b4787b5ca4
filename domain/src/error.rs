//! Error types for the `domain` layer.
use provider_auth::error::{Error as ProviderAuthError, ErrorKind as ProviderAuthErrorKind, OAuthErrorKind};
use log::*;
use std::error::Error as StdError;
use std::fmt;

/// Shown in place of transport details, which name internal provider URLs.
pub const PROVIDER_UNAVAILABLE_DESCRIPTION: &str =
    "The identity provider could not be reached or sent an unreadable response. Please try again later.";

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. Ex. `domain` is dependent on `provider_auth`, and `web` is dependent
/// on `domain`, but `web` should not be dependent, directly, on `provider_auth`. Ultimately
/// the various `error_kind`s are used by `web` to pick the view and HTTP status returned
/// to the browser.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    Authorization(AuthorizationError),
}

/// Failures of our own machinery rather than of the login attempt.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Session,
    View,
}

/// Why a login attempt ended without an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationErrorKind {
    /// The user declined, or the provider refused before issuing a code.
    ProviderDenied,
    /// The code-for-token exchange was rejected (expired code, verifier or redirect URI mismatch).
    TokenExchangeFailed,
    /// The token was issued but the provider would not return the user.
    UserFetchFailed,
    /// The user has no registration for this application.
    NotRegistered,
    /// The provider could not be reached or answered with something unreadable.
    ProviderUnavailable,
}

/// A failed login attempt with the text shown on the error page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationError {
    pub kind: AuthorizationErrorKind,
    pub reason: String,
    pub description: String,
}

impl AuthorizationErrorKind {
    /// Headline shown on the error page.
    pub fn message(&self) -> &'static str {
        match self {
            AuthorizationErrorKind::ProviderDenied
            | AuthorizationErrorKind::TokenExchangeFailed => "Failed to get auth token.",
            AuthorizationErrorKind::UserFetchFailed => "Failed to get user info.",
            AuthorizationErrorKind::NotRegistered => "User not registered for this application.",
            AuthorizationErrorKind::ProviderUnavailable => "Identity provider unavailable.",
        }
    }
}

impl Error {
    pub fn authorization(
        kind: AuthorizationErrorKind,
        reason: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Authorization(AuthorizationError {
                kind,
                reason: reason.into(),
                description: description.into(),
            }),
        }
    }

    pub fn internal(kind: InternalErrorKind, source: impl StdError + Send + Sync + 'static) -> Self {
        Error {
            source: Some(Box::new(source)),
            error_kind: DomainErrorKind::Internal(kind),
        }
    }

    /// The authorization failure kind, if this error ended a login attempt.
    pub fn authorization_kind(&self) -> Option<AuthorizationErrorKind> {
        match &self.error_kind {
            DomainErrorKind::Authorization(err) => Some(err.kind),
            DomainErrorKind::Internal(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `provider_auth` layer to the `domain` layer.
impl From<ProviderAuthError> for Error {
    fn from(err: ProviderAuthError) -> Self {
        let authorization_error = match &err.error_kind {
            ProviderAuthErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed(details)) => {
                AuthorizationError {
                    kind: AuthorizationErrorKind::TokenExchangeFailed,
                    reason: details.reason().to_string(),
                    description: details.description().to_string(),
                }
            }
            ProviderAuthErrorKind::OAuth(OAuthErrorKind::UserRetrievalFailed(details)) => {
                AuthorizationError {
                    kind: AuthorizationErrorKind::UserFetchFailed,
                    reason: details.reason().to_string(),
                    description: details.description().to_string(),
                }
            }
            ProviderAuthErrorKind::OAuth(OAuthErrorKind::InvalidResponse)
            | ProviderAuthErrorKind::Http(_) => {
                warn!("Identity provider unavailable: {err:?}");
                AuthorizationError {
                    kind: AuthorizationErrorKind::ProviderUnavailable,
                    reason: "provider_unavailable".to_string(),
                    description: PROVIDER_UNAVAILABLE_DESCRIPTION.to_string(),
                }
            }
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Authorization(authorization_error),
        }
    }
}
