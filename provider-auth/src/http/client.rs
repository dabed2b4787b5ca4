//! HTTP client builder for identity provider calls.

use std::time::Duration;

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Per-request timeout, covering connect through reading the body.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: format!("provider-auth/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Builder for the HTTP client used to reach the identity provider.
///
/// No retry middleware is installed; a failed provider call ends the login attempt.
pub struct ProviderClientBuilder {
    config: HttpClientConfig,
}

impl ProviderClientBuilder {
    /// Create a new client builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: HttpClientConfig::default(),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.config.user_agent = user_agent;
        self
    }

    /// Build the configured HTTP client.
    pub fn build(self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(self.config.timeout)
            .user_agent(self.config.user_agent)
            .build()
    }
}

impl Default for ProviderClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_default() {
        let builder = ProviderClientBuilder::new();
        assert_eq!(builder.config.timeout, Duration::from_secs(10));
        assert!(builder.config.user_agent.starts_with("provider-auth/"));
    }

    #[test]
    fn test_builder_with_timeout() {
        let builder = ProviderClientBuilder::new().with_timeout(Duration::from_secs(60));
        assert_eq!(builder.config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_builder_with_user_agent() {
        let builder = ProviderClientBuilder::new().with_user_agent("login-app/1".to_string());
        assert_eq!(builder.config.user_agent, "login-app/1");
    }

    #[tokio::test]
    async fn test_build_client() {
        let builder = ProviderClientBuilder::new();
        let result = builder.build();
        assert!(result.is_ok());
    }
}
