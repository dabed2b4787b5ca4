//! Identity provider gateway.
//!
//! Re-exports the provider types from provider-auth so the web layer only depends on `domain`.

pub use provider_auth::oauth::{
    AuthorizeKind, CodeExchange, IdentityProvider, PkcePair, PkceVerifier, Registration,
    TokenResponse, UrlBuilder, User,
};
pub use provider_auth::error::{
    oauth_error, Error as ProviderError, ErrorKind as ProviderErrorKind, HttpErrorKind,
    OAuthErrorKind, ProviderErrorResponse,
};
