//! Error types for the Netxhr core library
//!
//! Sending a request never fails synchronously: transport failures reach the
//! caller through the `onerror` callback as a [`TransportError`](crate::http::TransportError).
//! The [`Error`] type below covers the work done before a request exists:
//! resolving the environment key and building the network client.

use thiserror::Error;

/// Main error type for Netxhr operations
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown environment key
    #[error("Unknown environment '{name}' (expected local, staging or production)")]
    InvalidEnvironment { name: String },

    /// Network client construction errors
    #[error("HTTP client error: {message}")]
    HttpClient {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, Environment};
    use std::error::Error as _;

    #[test]
    fn test_invalid_environment_display() {
        let err = "qa".parse::<Environment>().unwrap_err();
        assert!(matches!(err, Error::InvalidEnvironment { ref name } if name == "qa"));
        assert!(err.to_string().contains("'qa'"));
    }

    #[test]
    fn test_http_client_keeps_source() {
        let cause = std::io::Error::new(std::io::ErrorKind::Other, "no tls backend");
        let err = Error::HttpClient {
            message: "Failed to create HTTP client".to_string(),
            source: Some(Box::new(cause)),
        };
        assert_eq!(err.to_string(), "HTTP client error: Failed to create HTTP client");
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("no tls backend"));
    }

    #[test]
    fn test_config_errors_are_invalid_environment() {
        // The only fallible step of configuration is parsing the key
        let mut config = ClientConfig::default();
        std::env::set_var(crate::config::ENV_ENVIRONMENT, "nowhere");
        let result = config.merge_with_env();
        std::env::remove_var(crate::config::ENV_ENVIRONMENT);

        assert!(matches!(result, Err(Error::InvalidEnvironment { .. })));
    }
}
