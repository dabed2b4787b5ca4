//! Error types for the `provider-auth` crate.
//!
//! Follows the same pattern as domain::error with a root Error struct and error kind enums.

use std::error::Error as StdError;
use std::fmt;

use serde::Deserialize;

/// Top-level error type for provider-auth crate.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in provider-auth.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    OAuth(OAuthErrorKind),
    Http(HttpErrorKind),
}

/// Errors reported by the identity provider itself.
#[derive(Debug, PartialEq)]
pub enum OAuthErrorKind {
    /// The provider rejected the authorization code exchange.
    TokenExchangeFailed(ProviderErrorResponse),
    /// The provider refused to return the user for the access token.
    UserRetrievalFailed(ProviderErrorResponse),
    /// The provider answered with a body we could not understand.
    InvalidResponse,
}

/// Errors from HTTP client operations.
#[derive(Debug, PartialEq)]
pub enum HttpErrorKind {
    BuilderFailed,
    RequestFailed,
    Timeout,
    Network,
}

/// Error details as the provider reports them.
///
/// The OAuth endpoints answer with `error`, `error_reason` and `error_description`;
/// API endpoints answer with a list of general errors which is folded into the
/// same shape by [`ProviderErrorResponse::from_api_errors`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProviderErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_reason: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrors {
    #[serde(default)]
    general_errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    message: String,
}

impl ProviderErrorResponse {
    /// Parses an OAuth endpoint error body. Bodies that are not the expected JSON
    /// keep the raw text as the description.
    pub fn from_oauth_body(status: u16, body: &str) -> Self {
        serde_json::from_str::<ProviderErrorResponse>(body).unwrap_or_else(|_| Self {
            error: None,
            error_reason: Some(format!("http_{status}")),
            error_description: Some(body.to_string()).filter(|b| !b.is_empty()),
        })
    }

    /// Parses an API endpoint error body (`{"generalErrors": [{"code", "message"}]}`).
    /// A 401 from the user endpoint carries no body at all.
    pub fn from_api_errors(status: u16, body: &str) -> Self {
        let errors = serde_json::from_str::<ApiErrors>(body).unwrap_or_default();
        match errors.general_errors.into_iter().next() {
            Some(first) => Self {
                error: None,
                error_reason: Some(first.code),
                error_description: Some(first.message),
            },
            None => Self {
                error: None,
                error_reason: Some(format!("http_{status}")),
                error_description: Some(body.to_string()).filter(|b| !b.is_empty()),
            },
        }
    }

    /// The reason to show the user, falling back to the bare OAuth `error` code.
    pub fn reason(&self) -> &str {
        self.error_reason
            .as_deref()
            .or(self.error.as_deref())
            .unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.error_description.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::OAuth(kind) => write!(f, "OAuth error: {:?}", kind),
            ErrorKind::Http(kind) => write!(f, "HTTP error: {:?}", kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let error_kind = if err.is_builder() {
            ErrorKind::Http(HttpErrorKind::BuilderFailed)
        } else if err.is_timeout() {
            ErrorKind::Http(HttpErrorKind::Timeout)
        } else if err.is_decode() {
            ErrorKind::OAuth(OAuthErrorKind::InvalidResponse)
        } else if err.is_request() {
            ErrorKind::Http(HttpErrorKind::RequestFailed)
        } else {
            ErrorKind::Http(HttpErrorKind::Network)
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

/// Helper function to create OAuth errors.
pub fn oauth_error(kind: OAuthErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::OAuth(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oauth_body_is_parsed() {
        let body = r#"{"error":"invalid_request","error_reason":"auth_code_not_found","error_description":"The code was not found."}"#;
        let response = ProviderErrorResponse::from_oauth_body(400, body);

        assert_eq!(response.reason(), "auth_code_not_found");
        assert_eq!(response.description(), "The code was not found.");
    }

    #[test]
    fn test_reason_falls_back_to_error_code() {
        let body = r#"{"error":"invalid_grant"}"#;
        let response = ProviderErrorResponse::from_oauth_body(400, body);

        assert_eq!(response.reason(), "invalid_grant");
        assert_eq!(response.description(), "");
    }

    #[test]
    fn test_unparseable_oauth_body_keeps_raw_text() {
        let response = ProviderErrorResponse::from_oauth_body(500, "upstream exploded");

        assert_eq!(response.reason(), "http_500");
        assert_eq!(response.description(), "upstream exploded");
    }

    #[test]
    fn test_api_errors_use_first_general_error() {
        let body = r#"{"generalErrors":[{"code":"[NotFound]","message":"No user found."}]}"#;
        let response = ProviderErrorResponse::from_api_errors(404, body);

        assert_eq!(response.reason(), "[NotFound]");
        assert_eq!(response.description(), "No user found.");
    }

    #[test]
    fn test_empty_api_error_body_reports_status() {
        let response = ProviderErrorResponse::from_api_errors(401, "");

        assert_eq!(response.reason(), "http_401");
        assert_eq!(response.description(), "");
    }

    #[test]
    fn test_display_names_category() {
        let err = oauth_error(OAuthErrorKind::InvalidResponse, "bad json");
        assert_eq!(err.to_string(), "OAuth error: InvalidResponse");
        assert!(err.source().is_some());
    }
}
