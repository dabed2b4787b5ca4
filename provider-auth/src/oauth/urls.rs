//! Browser redirect URLs for the provider's hosted login, registration and logout pages.

use super::pkce::PkceChallenge;

/// Which hosted page starts the authorization code flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizeKind {
    Login,
    Register,
}

impl AuthorizeKind {
    fn endpoint(&self) -> &'static str {
        match self {
            AuthorizeKind::Login => "authorize",
            AuthorizeKind::Register => "register",
        }
    }
}

/// Builds provider URLs for one OAuth client.
///
/// Any `redirect_uri` or `post_logout_redirect_uri` passed here must be listed verbatim
/// in the application's Authorized Redirect URLs on the provider, trailing slash
/// included, or the provider rejects the request.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base_url: String,
    client_id: String,
}

impl UrlBuilder {
    pub fn new(base_url: &str, client_id: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
        }
    }

    /// `{base}/oauth2/{authorize|register}` with an S256 PKCE challenge.
    pub fn authorization_url(
        &self,
        kind: AuthorizeKind,
        challenge: &PkceChallenge,
        callback_url: &str,
    ) -> String {
        format!(
            "{}/oauth2/{}?\
            client_id={}&\
            response_type=code&\
            code_challenge={}&\
            code_challenge_method={}&\
            redirect_uri={}",
            self.base_url,
            kind.endpoint(),
            urlencoding::encode(&self.client_id),
            challenge.as_str(),
            PkceChallenge::METHOD,
            urlencoding::encode(callback_url)
        )
    }

    /// `{base}/oauth2/logout`, which clears the provider session and then sends the
    /// browser to `redirect_url`.
    pub fn logout_url(&self, redirect_url: &str) -> String {
        format!(
            "{}/oauth2/logout?client_id={}&post_logout_redirect_uri={}",
            self.base_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_url)
        )
    }
}
