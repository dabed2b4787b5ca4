use config::Config;
use log::info;
use provider_auth::http::ProviderClientBuilder;
use provider_auth::oauth::{providers::fusionauth, IdentityProvider};
use std::sync::Arc;

pub mod config;
pub mod logging;

/// Builds the FusionAuth client with the configured per-call timeout.
pub fn init_identity_provider(
    config: &Config,
) -> Result<Arc<dyn IdentityProvider>, provider_auth::Error> {
    info!(
        "Identity provider client: base_url={}, timeout={}s",
        config.provider_base_url(),
        config.provider_timeout_secs,
    );

    let http_client = ProviderClientBuilder::new()
        .with_timeout(config.provider_timeout())
        .build()?;

    Ok(Arc::new(fusionauth::Provider::new(
        &config.provider_base_url(),
        http_client,
    )))
}

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub config: Config,
}

impl AppState {
    pub fn new(app_config: Config, identity_provider: &Arc<dyn IdentityProvider>) -> Self {
        Self {
            identity_provider: Arc::clone(identity_provider),
            config: app_config,
        }
    }

    pub fn identity_provider_ref(&self) -> &dyn IdentityProvider {
        self.identity_provider.as_ref()
    }
}
