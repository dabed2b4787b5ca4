//! Identity provider trait and types.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// Everything the token endpoint needs to redeem a PKCE-bound authorization code.
#[derive(Debug)]
pub struct CodeExchange<'a> {
    /// Authorization code from the callback.
    pub code: &'a str,
    /// The exact redirect URI the flow was started with.
    pub redirect_uri: &'a str,
    /// The verifier whose challenge was sent with the authorization request.
    pub code_verifier: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a SecretString,
}

/// Successful token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: SecretString,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<SecretString>,
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
}

/// A user's registration for one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub application_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    /// Remaining registration fields, kept as the provider sent them.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// The user object as the provider returns it.
///
/// Only the fields this application reads are typed; everything else is carried
/// along untouched so the full profile can be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrations: Option<Vec<Registration>>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Trait for the OAuth 2.0 identity provider this application delegates to.
///
/// Implementations perform exactly one network round-trip per call and never retry;
/// a failed call is terminal for the login attempt.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange an authorization code for tokens using the PKCE verifier.
    ///
    /// A rejection by the provider is reported as
    /// [`OAuthErrorKind::TokenExchangeFailed`](crate::error::OAuthErrorKind::TokenExchangeFailed).
    async fn exchange_code_with_pkce(
        &self,
        exchange: &CodeExchange<'_>,
    ) -> Result<TokenResponse, Error>;

    /// Retrieve the user that owns `access_token`.
    ///
    /// A rejection by the provider is reported as
    /// [`OAuthErrorKind::UserRetrievalFailed`](crate::error::OAuthErrorKind::UserRetrievalFailed).
    async fn retrieve_user_using_jwt(&self, access_token: &SecretString) -> Result<User, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_user_keeps_unknown_fields() {
        let json = serde_json::json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "email": "richard@example.com",
            "firstName": "Richard",
            "active": true,
            "registrations": [
                {"applicationId": "app-1", "roles": ["admin"], "verified": true}
            ]
        });

        let user: User = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(user.first_name.as_deref(), Some("Richard"));
        assert_eq!(user.other.get("active"), Some(&Value::Bool(true)));

        let registrations = user.registrations.as_ref().unwrap();
        assert_eq!(registrations[0].application_id, "app-1");
        assert_eq!(registrations[0].other.get("verified"), Some(&Value::Bool(true)));

        assert_eq!(serde_json::to_value(&user).unwrap(), json);
    }

    #[test]
    fn test_token_response_reads_user_id() {
        let token: TokenResponse = serde_json::from_str(
            r#"{"access_token":"jwt","token_type":"Bearer","expires_in":3600,"userId":"u-1"}"#,
        )
        .unwrap();

        assert_eq!(token.access_token.expose_secret(), "jwt");
        assert_eq!(token.user_id.as_deref(), Some("u-1"));
        assert!(token.refresh_token.is_none());
    }
}
