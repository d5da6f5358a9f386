use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Credential used when neither the config nor the environment provides one
pub const FALLBACK_API_KEY: &str = "demo";

/// Legacy environment variable consulted for the OpenWeatherMap key
const LEGACY_API_KEY_VAR: &str = "API_KEY";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound for handling a whole inbound request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// OpenWeatherMap connection settings
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// Current-weather-by-city endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// OpenWeatherMap API key
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Timeout for a single upstream call
    #[serde(default = "default_upstream_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: default_api_key(),
            timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

impl UpstreamConfig {
    /// True when no real credential was configured
    pub fn uses_fallback_key(&self) -> bool {
        self.api_key == FALLBACK_API_KEY
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_api_key() -> String {
    std::env::var(LEGACY_API_KEY_VAR)
        .ok()
        .filter(|key| !key.is_empty())
        .unwrap_or_else(|| FALLBACK_API_KEY.to_string())
}

fn default_upstream_timeout_secs() -> u64 {
    10
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Start with default values
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("request_timeout_secs", default_request_timeout_secs())?
            .set_default("upstream.base_url", default_base_url())?
            .set_default("upstream.api_key", default_api_key())?
            .set_default("upstream.timeout_secs", default_upstream_timeout_secs())?
            // Load from config file if present
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // Override with environment variables (prefixed with WEATHERPAGE_)
            // e.g. WEATHERPAGE_UPSTREAM__API_KEY -> upstream.api_key
            .add_source(
                Environment::with_prefix("WEATHERPAGE")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
