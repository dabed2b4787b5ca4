//! FusionAuth identity provider implementation.

use async_trait::async_trait;
use log::*;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{oauth_error, Error, OAuthErrorKind, ProviderErrorResponse};
use crate::oauth::{CodeExchange, IdentityProvider, TokenResponse, User};

/// Form body for `POST /oauth2/token` with a PKCE verifier.
#[derive(Serialize)]
struct TokenExchangeRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    code_verifier: &'a str,
    grant_type: &'static str,
    redirect_uri: &'a str,
}

/// Body of `GET /api/user`.
#[derive(Deserialize)]
struct UserResponse {
    user: User,
}

/// FusionAuth client for the token and user endpoints.
pub struct Provider {
    base_url: String,
    http_client: reqwest::Client,
}

impl Provider {
    /// Create a new FusionAuth provider.
    ///
    /// # Arguments
    ///
    /// * `base_url` - FusionAuth base URL, e.g. `http://localhost:9011`
    /// * `http_client` - Client carrying the per-call timeout
    pub fn new(base_url: &str, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl IdentityProvider for Provider {
    async fn exchange_code_with_pkce(
        &self,
        exchange: &CodeExchange<'_>,
    ) -> Result<TokenResponse, Error> {
        let request = TokenExchangeRequest {
            client_id: exchange.client_id,
            client_secret: exchange.client_secret.expose_secret(),
            code: exchange.code,
            code_verifier: exchange.code_verifier,
            grant_type: "authorization_code",
            redirect_uri: exchange.redirect_uri,
        };

        debug!("Exchanging authorization code for tokens");

        let response = self
            .http_client
            .post(self.endpoint("/oauth2/token"))
            .form(&request)
            .send()
            .await
            .inspect_err(|e| warn!("Token endpoint unreachable: {:?}", e))?;

        let status = response.status();
        if status.is_success() {
            let tokens: TokenResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse token response: {:?}", e);
                oauth_error(OAuthErrorKind::InvalidResponse, &e.to_string())
            })?;
            debug!("Authorization code exchanged for tokens");
            Ok(tokens)
        } else {
            let body = response.text().await.unwrap_or_default();
            let details = ProviderErrorResponse::from_oauth_body(status.as_u16(), &body);
            warn!(
                "Token exchange rejected with status {}: {}",
                status,
                details.reason()
            );
            Err(oauth_error(
                OAuthErrorKind::TokenExchangeFailed(details),
                "token exchange rejected",
            ))
        }
    }

    async fn retrieve_user_using_jwt(&self, access_token: &SecretString) -> Result<User, Error> {
        debug!("Retrieving user for access token");

        let response = self
            .http_client
            .get(self.endpoint("/api/user"))
            .bearer_auth(access_token.expose_secret())
            .send()
            .await
            .inspect_err(|e| warn!("User endpoint unreachable: {:?}", e))?;

        let status = response.status();
        if status.is_success() {
            let body: UserResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse user response: {:?}", e);
                oauth_error(OAuthErrorKind::InvalidResponse, &e.to_string())
            })?;
            debug!("Retrieved user {}", body.user.id);
            Ok(body.user)
        } else {
            let body = response.text().await.unwrap_or_default();
            let details = ProviderErrorResponse::from_api_errors(status.as_u16(), &body);
            warn!(
                "User retrieval rejected with status {}: {}",
                status,
                details.reason()
            );
            Err(oauth_error(
                OAuthErrorKind::UserRetrievalFailed(details),
                "user retrieval rejected",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, HttpErrorKind};
    use crate::http::ProviderClientBuilder;
    use mockito::{Matcher, Server};
    use std::time::Duration;

    fn provider(base_url: &str) -> Provider {
        let client = ProviderClientBuilder::new()
            .with_timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        Provider::new(base_url, client)
    }

    fn exchange<'a>(secret: &'a SecretString) -> CodeExchange<'a> {
        CodeExchange {
            code: "auth-code",
            redirect_uri: "http://localhost:5000/oauth-callback",
            code_verifier: "verifier-123",
            client_id: "client-1",
            client_secret: secret,
        }
    }

    #[tokio::test]
    async fn test_exchange_code_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/oauth2/token")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
                Matcher::UrlEncoded("code".into(), "auth-code".into()),
                Matcher::UrlEncoded("code_verifier".into(), "verifier-123".into()),
                Matcher::UrlEncoded("client_id".into(), "client-1".into()),
                Matcher::UrlEncoded("client_secret".into(), "secret".into()),
                Matcher::UrlEncoded(
                    "redirect_uri".into(),
                    "http://localhost:5000/oauth-callback".into(),
                ),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"jwt-token","token_type":"Bearer","expires_in":3600,"userId":"u-1"}"#)
            .create_async()
            .await;

        let secret = SecretString::new("secret".to_string());
        let tokens = provider(&server.url())
            .exchange_code_with_pkce(&exchange(&secret))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(tokens.access_token.expose_secret(), "jwt-token");
        assert_eq!(tokens.user_id.as_deref(), Some("u-1"));
    }

    #[tokio::test]
    async fn test_exchange_code_rejected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/oauth2/token")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"invalid_request","error_reason":"auth_code_not_found","error_description":"The code was not found."}"#)
            .create_async()
            .await;

        let secret = SecretString::new("secret".to_string());
        let err = provider(&server.url())
            .exchange_code_with_pkce(&exchange(&secret))
            .await
            .unwrap_err();

        match err.error_kind {
            ErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed(details)) => {
                assert_eq!(details.reason(), "auth_code_not_found");
                assert_eq!(details.description(), "The code was not found.");
            }
            other => panic!("Expected TokenExchangeFailed, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_exchange_code_malformed_success_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/oauth2/token")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let secret = SecretString::new("secret".to_string());
        let err = provider(&server.url())
            .exchange_code_with_pkce(&exchange(&secret))
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            ErrorKind::OAuth(OAuthErrorKind::InvalidResponse)
        );
    }

    #[tokio::test]
    async fn test_exchange_code_unreachable_provider() {
        // Nothing listens on port 1.
        let secret = SecretString::new("secret".to_string());
        let err = provider("http://127.0.0.1:1")
            .exchange_code_with_pkce(&exchange(&secret))
            .await
            .unwrap_err();

        assert!(matches!(err.error_kind, ErrorKind::Http(_)));
        assert_ne!(err.error_kind, ErrorKind::Http(HttpErrorKind::BuilderFailed));
    }

    #[tokio::test]
    async fn test_retrieve_user_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/user")
            .match_header("authorization", "Bearer jwt-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"user":{"id":"u-1","email":"richard@example.com","active":true,
                    "registrations":[{"applicationId":"client-1","roles":["user"]}]}}"#,
            )
            .create_async()
            .await;

        let token = SecretString::new("jwt-token".to_string());
        let user = provider(&server.url())
            .retrieve_user_using_jwt(&token)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(user.id, "u-1");
        assert_eq!(user.email.as_deref(), Some("richard@example.com"));
        assert_eq!(
            user.registrations.unwrap()[0].application_id,
            "client-1".to_string()
        );
    }

    #[tokio::test]
    async fn test_retrieve_user_unauthorized() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/user")
            .with_status(401)
            .create_async()
            .await;

        let token = SecretString::new("expired".to_string());
        let err = provider(&server.url())
            .retrieve_user_using_jwt(&token)
            .await
            .unwrap_err();

        match err.error_kind {
            ErrorKind::OAuth(OAuthErrorKind::UserRetrievalFailed(details)) => {
                assert_eq!(details.reason(), "http_401");
            }
            other => panic!("Expected UserRetrievalFailed, got: {:?}", other),
        }
    }
}
