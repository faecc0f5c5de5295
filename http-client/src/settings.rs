use std::collections::HashMap;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::client::{DEFAULT_MAX_CONNECTIONS, DEFAULT_TIMEOUT};

/// Deserializable client configuration.
///
/// The bearer token is an injection point for deployments, never a source
/// default. Extra `headers` are merged into the client's default header set.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSettings {
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    #[serde(default)]
    pub bearer_token: Option<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_max_connections() -> usize {
    DEFAULT_MAX_CONNECTIONS
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            bearer_token: None,
            headers: HashMap::new(),
        }
    }
}

impl ClientSettings {
    /// Loads settings from the file named by `HTTP_CLIENT_CONFIG` (if set)
    /// with `HTTP_CLIENT__`-prefixed environment variables layered on top.
    pub fn new() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Ok(path) = std::env::var("HTTP_CLIENT_CONFIG") {
            builder = builder.add_source(File::with_name(&path));
        }

        builder
            .add_source(Environment::with_prefix("HTTP_CLIENT").separator("__"))
            .build()?
            .try_deserialize()
    }
}
