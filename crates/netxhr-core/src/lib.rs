//! Netxhr Core - a minimal HTTP request facade
//!
//! Requests are configured and sent through a single facade that is backed
//! either by a real network transport or by a deterministic mock, chosen
//! once from the host's capabilities.
//!
//! # Main Components
//!
//! - **Configuration**: environment-keyed API host resolution
//! - **Query Encoder**: URL component encoding of GET data
//! - **Transports**: reqwest-backed network transport and an always-successful mock
//! - **Request Facade**: construction overrides, headers, body serialization and callbacks
//!
//! # Example
//!
//! ```no_run
//! use netxhr_core::{ClientConfig, HttpContext, Request, RequestOptions};
//!
//! fn example() -> netxhr_core::Result<()> {
//!     let config = ClientConfig::from_env()?;
//!     let context = HttpContext::from_config(&config);
//!
//!     let mut request = Request::new(
//!         &context,
//!         RequestOptions::new()
//!             .method("POST")
//!             .url("/api/user")
//!             .onload(|response| println!("{}", response.response_text)),
//!     );
//!     request.send(Some(serde_json::json!({"name": "ada"}).into()));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;

// Re-export main types for convenience
pub use config::{ApiHosts, ClientConfig, Environment, NetworkConfig};
pub use error::{Error, Result};
pub use http::{
    HostCapability, HttpContext, Request, RequestData, RequestOptions, RequestSpec,
    RequestState, Response, Transport, TransportError, TransportKind,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_error_creation() {
        let err = Error::InvalidEnvironment {
            name: "qa".to_string(),
        };
        assert!(err.to_string().contains("qa"));
    }
}
