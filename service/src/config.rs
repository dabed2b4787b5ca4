use clap::builder::{NonEmptyStringValueParser, TypedValueParser as _};
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Path the identity provider redirects back to after login or registration.
pub const OAUTH_CALLBACK_PATH: &str = "/oauth-callback";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// FusionAuth API key. Required at startup; the login flow itself authenticates
    /// with the client credentials and the user's access token instead.
    #[arg(
        long,
        env = "FUSIONAUTH_API_KEY",
        hide_env_values = true,
        value_parser = NonEmptyStringValueParser::new()
    )]
    #[allow(dead_code)]
    fusionauth_api_key: String,

    /// OAuth client id of this application in FusionAuth. Users must hold a
    /// registration for this application id to log in.
    #[arg(long, env = "FUSIONAUTH_CLIENT_ID", value_parser = NonEmptyStringValueParser::new())]
    fusionauth_client_id: String,

    /// OAuth client secret of this application in FusionAuth.
    #[arg(
        long,
        env = "FUSIONAUTH_CLIENT_SECRET",
        hide_env_values = true,
        value_parser = NonEmptyStringValueParser::new()
    )]
    fusionauth_client_secret: String,

    /// Host name or IP address of the FusionAuth instance
    #[arg(long, env = "FUSIONAUTH_HOST_IP", default_value = "localhost")]
    fusionauth_host_ip: String,

    /// TCP port of the FusionAuth instance
    #[arg(long, env = "FUSIONAUTH_HOST_PORT", default_value_t = 9011)]
    fusionauth_host_port: u16,

    /// External base URL of this application as browsers reach it. Both
    /// `{APP_BASE_URL}/oauth-callback` and `{APP_BASE_URL}/` must be listed exactly,
    /// trailing slash included, in the application's Authorized Redirect URLs in FusionAuth.
    #[arg(long, env, default_value = "http://localhost:5000")]
    app_base_url: String,

    /// Timeout in seconds for each call to the identity provider
    #[arg(long, env, default_value_t = 10)]
    pub provider_timeout_secs: u64,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 5000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,

    /// Session expiry duration in seconds of inactivity (default: 24 hours = 86400 seconds)
    #[arg(long, env, default_value_t = 86400, value_parser = clap::value_parser!(i64).range(1..))]
    pub session_expiry_seconds: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Loads `.env`, then parses flags and environment. Exits the process with a
    /// usage error when a required credential is missing.
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn client_id(&self) -> &str {
        &self.fusionauth_client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.fusionauth_client_secret
    }

    /// Base URL of the FusionAuth instance, e.g. `http://localhost:9011`.
    pub fn provider_base_url(&self) -> String {
        format!(
            "http://{}:{}",
            self.fusionauth_host_ip, self.fusionauth_host_port
        )
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    fn app_base_url(&self) -> &str {
        self.app_base_url.trim_end_matches('/')
    }

    /// Absolute callback URL sent as `redirect_uri`, both when starting the flow and
    /// when exchanging the code.
    pub fn callback_url(&self) -> String {
        format!("{}{}", self.app_base_url(), OAUTH_CALLBACK_PATH)
    }

    /// Absolute URL of the home page, with trailing slash.
    pub fn home_url(&self) -> String {
        format!("{}/", self.app_base_url())
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}
