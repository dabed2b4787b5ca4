//! OAuth 2.0 authorization code flow with PKCE.
//!
//! Provides PKCE generation, the provider's browser redirect URLs and the
//! identity provider client used to finish the flow server-side.

mod pkce;
mod provider;
mod urls;

pub mod providers;

pub use pkce::{PkceChallenge, PkcePair, PkceVerifier};
pub use provider::{CodeExchange, IdentityProvider, Registration, TokenResponse, User};
pub use urls::{AuthorizeKind, UrlBuilder};
