//! # provider-auth
//!
//! Everything needed to talk to the external identity provider:
//! - PKCE verifier/challenge generation (RFC 7636)
//! - Hosted login, registration and logout URLs
//! - The identity provider client trait and its FusionAuth implementation
//! - HTTP client building with a per-call timeout
//!
//! ## Usage
//!
//! ```rust,ignore
//! use provider_auth::{
//!     http::ProviderClientBuilder,
//!     oauth::{providers::fusionauth, AuthorizeKind, PkcePair, UrlBuilder},
//! };
//! ```

pub mod error;
pub mod http;
pub mod oauth;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
