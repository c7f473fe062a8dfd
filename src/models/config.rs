//! Configuration model loaded from external sources.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared by all provider adapters.
pub struct AppConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Maximum in-flight HTTP requests per provider.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; titlescout/0.1)".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_concurrency() -> usize {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
            concurrency: default_concurrency(),
        }
    }
}

/// Loads the configuration from an optional `titlescout.yaml` next to the
/// working directory, overridden by `TITLESCOUT_*` environment variables.
/// Missing sources fall back to the defaults.
pub fn load() -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(File::with_name("titlescout").required(false))
        .add_source(Environment::with_prefix("TITLESCOUT"))
        .build()?
        .try_deserialize()
}
