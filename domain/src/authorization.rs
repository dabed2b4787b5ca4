//! The PKCE authorization code flow: starting it, finishing it, and leaving.
//!
//! Session bookkeeping stays in the web layer; this module only decides where the
//! browser goes and whether a callback yields a user.

use crate::error::{AuthorizationErrorKind, Error};
use crate::gateway::oauth::{AuthorizeKind, CodeExchange, IdentityProvider, PkcePair, UrlBuilder, User};
use crate::user::user_is_registered;
use log::*;
use secrecy::SecretString;
use serde::Deserialize;
use service::config::Config;

/// Where to send the browser to start a flow, and the verifier to keep until it returns.
#[derive(Debug)]
pub struct AuthorizationStart {
    pub url: String,
    pub code_verifier: String,
}

/// Query parameters the provider appends when redirecting back.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_reason: Option<String>,
    pub error_description: Option<String>,
}

fn url_builder(config: &Config) -> UrlBuilder {
    UrlBuilder::new(&config.provider_base_url(), config.client_id())
}

/// Generate a fresh PKCE pair and the hosted login or registration URL carrying its challenge.
pub fn start(config: &Config, kind: AuthorizeKind) -> AuthorizationStart {
    let pkce = PkcePair::generate();
    let url = url_builder(config).authorization_url(kind, &pkce.challenge, &config.callback_url());

    AuthorizationStart {
        url,
        code_verifier: pkce.verifier.into_string(),
    }
}

/// The provider logout URL, which returns the browser to our home page afterwards.
pub fn logout_url(config: &Config) -> String {
    url_builder(config).logout_url(&config.home_url())
}

/// Finish the flow for a callback request.
///
/// `code_verifier` is the verifier stored when the flow started, if the session still
/// has it. Returns the provider's user when the code redeems, the user loads and the
/// user is registered for this application. Nothing is retried.
pub async fn complete(
    provider: &dyn IdentityProvider,
    config: &Config,
    params: &CallbackParams,
    code_verifier: Option<&str>,
) -> Result<User, Error> {
    let code = match params.code.as_deref().filter(|code| !code.is_empty()) {
        Some(code) => code,
        None => {
            let reason = params
                .error_reason
                .as_deref()
                .or(params.error.as_deref())
                .unwrap_or_default();
            warn!("Provider redirected back without a code: {}", reason);
            return Err(Error::authorization(
                AuthorizationErrorKind::ProviderDenied,
                reason,
                params.error_description.as_deref().unwrap_or_default(),
            ));
        }
    };

    let Some(code_verifier) = code_verifier else {
        warn!("Callback arrived without a pending code verifier in the session");
        return Err(Error::authorization(
            AuthorizationErrorKind::TokenExchangeFailed,
            "missing_code_verifier",
            "No login is in progress for this session. Start the login again.",
        ));
    };

    let callback_url = config.callback_url();
    let client_secret = SecretString::new(config.client_secret().to_string());
    let tokens = provider
        .exchange_code_with_pkce(&CodeExchange {
            code,
            redirect_uri: &callback_url,
            code_verifier,
            client_id: config.client_id(),
            client_secret: &client_secret,
        })
        .await?;

    let user = provider
        .retrieve_user_using_jwt(&tokens.access_token)
        .await?;

    if !user_is_registered(user.registrations.as_deref(), config.client_id()) {
        warn!(
            "User {} has no registration for application {}",
            user.id,
            config.client_id()
        );
        return Err(Error::authorization(
            AuthorizationErrorKind::NotRegistered,
            "Application id not found in user object.",
            "Did you create a registration for this user and this application?",
        ));
    }

    info!("User {} authenticated", user.id);
    Ok(user)
}
