//! Client configuration
//!
//! The API host a request talks to is selected by an environment key
//! (`local`, `staging` or `production`) from a static table. The table and
//! the key are resolved once at startup into a [`ClientConfig`] which is
//! then handed to [`HttpContext`](crate::http::HttpContext) explicitly.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Host used for every environment unless configured otherwise
pub const DEFAULT_API_HOST: &str = "http://localhost:3000";

/// Environment variable selecting the environment key
pub const ENV_ENVIRONMENT: &str = "NETXHR_ENVIRONMENT";

/// Environment variable overriding the resolved API host
pub const ENV_API_HOST: &str = "NETXHR_API_HOST";

/// Environment variable disabling the network transport
pub const ENV_OFFLINE: &str = "NETXHR_OFFLINE";

/// Deployment environment used to pick an API host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Local => write!(f, "local"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            _ => Err(Error::InvalidEnvironment {
                name: s.to_string(),
            }),
        }
    }
}

/// API host per environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiHosts {
    pub local: String,
    pub staging: String,
    pub production: String,
}

impl Default for ApiHosts {
    fn default() -> Self {
        Self {
            local: DEFAULT_API_HOST.to_string(),
            staging: DEFAULT_API_HOST.to_string(),
            production: DEFAULT_API_HOST.to_string(),
        }
    }
}

impl ApiHosts {
    /// Look up the host for an environment
    pub fn get(&self, environment: Environment) -> &str {
        match environment {
            Environment::Local => &self.local,
            Environment::Staging => &self.staging,
            Environment::Production => &self.production,
        }
    }
}

/// Settings for the network transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// When false, requests are always served by the mock transport
    pub enabled: bool,
    /// Whole-request timeout applied by the HTTP client
    pub timeout_secs: u64,
    /// Whether to validate TLS certificates
    pub validate_tls: bool,
    /// Optional User-Agent header for every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: 30,
            validate_tls: true,
            user_agent: None,
        }
    }
}

/// Resolved client configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Selected environment key
    pub environment: Environment,
    /// Explicit host, taking precedence over the table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,
    /// Host table keyed by environment
    pub api_hosts: ApiHosts,
    /// Network transport settings
    pub network: NetworkConfig,
}

impl ClientConfig {
    /// Configuration with defaults plus environment variable overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.merge_with_env()?;
        Ok(config)
    }

    /// The base host every request is sent to
    pub fn api_host(&self) -> &str {
        self.api_host
            .as_deref()
            .unwrap_or_else(|| self.api_hosts.get(self.environment))
    }

    /// Apply `NETXHR_*` environment variables on top of the current values
    pub fn merge_with_env(&mut self) -> Result<()> {
        if let Ok(environment) = std::env::var(ENV_ENVIRONMENT) {
            if !environment.is_empty() {
                self.environment = environment.parse()?;
            }
        }

        if let Ok(host) = std::env::var(ENV_API_HOST) {
            if !host.is_empty() {
                self.api_host = Some(host);
            }
        }

        if let Ok(offline) = std::env::var(ENV_OFFLINE) {
            let offline = offline.to_lowercase();
            self.network.enabled = !(offline == "true" || offline == "1");
        }

        tracing::debug!(
            environment = %self.environment,
            api_host = %self.api_host(),
            network_enabled = self.network.enabled,
            "Resolved client configuration"
        );

        Ok(())
    }
}
