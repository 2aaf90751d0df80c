//! Transport selection
//!
//! A request is backed by the network transport when the host can make real
//! requests, and by the mock transport otherwise. The capability is probed
//! once at startup and carried in an [`HttpContext`].

use crate::config::{ClientConfig, NetworkConfig};
use crate::http::client::{build_client, HttpTransport};
use crate::http::mock::MockTransport;
use crate::http::transport::{Transport, TransportKind};
use reqwest::Client as ReqwestClient;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// Whether a real network client is available
#[derive(Debug, Clone)]
pub enum HostCapability {
    /// A client and a runtime to drive it
    Network {
        client: ReqwestClient,
        handle: Handle,
    },
    /// No network stack; requests are mocked
    Unavailable,
}

impl HostCapability {
    /// Probe the host: the network must be enabled, a tokio runtime must be
    /// current and the client must build.
    pub fn detect(config: &NetworkConfig) -> Self {
        if !config.enabled {
            info!("Network disabled by configuration, using mock transport");
            return HostCapability::Unavailable;
        }

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                info!("No async runtime available, using mock transport");
                return HostCapability::Unavailable;
            }
        };

        match build_client(config) {
            Ok(client) => HostCapability::Network { client, handle },
            Err(e) => {
                warn!(error = %e, "HTTP client unavailable, using mock transport");
                HostCapability::Unavailable
            }
        }
    }

    /// Kind of transport this capability selects
    pub fn transport_kind(&self) -> TransportKind {
        match self {
            HostCapability::Network { .. } => TransportKind::Network,
            HostCapability::Unavailable => TransportKind::Mock,
        }
    }
}

/// Create a fresh transport for one request
pub fn select_transport(capability: &HostCapability) -> Box<dyn Transport> {
    let transport: Box<dyn Transport> = match capability {
        HostCapability::Network { client, handle } => {
            Box::new(HttpTransport::new(client.clone(), handle.clone()))
        }
        HostCapability::Unavailable => Box::new(MockTransport::new()),
    };
    debug!(kind = %transport.kind(), "Selected transport");
    transport
}

/// Startup-resolved state shared by every request
#[derive(Debug, Clone)]
pub struct HttpContext {
    api_host: String,
    capability: HostCapability,
}

impl HttpContext {
    pub fn new(api_host: impl Into<String>, capability: HostCapability) -> Self {
        Self {
            api_host: api_host.into(),
            capability,
        }
    }

    /// Resolve the host and probe the network once
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_host(), HostCapability::detect(&config.network))
    }

    /// Context whose requests are always mocked
    pub fn offline(api_host: impl Into<String>) -> Self {
        Self::new(api_host, HostCapability::Unavailable)
    }

    /// Base host used when a request does not override it
    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    pub fn capability(&self) -> &HostCapability {
        &self.capability
    }

    /// Create a fresh transport for one request
    pub fn transport(&self) -> Box<dyn Transport> {
        select_transport(&self.capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_runtime_selects_mock() {
        let capability = HostCapability::detect(&NetworkConfig::default());
        assert_eq!(capability.transport_kind(), TransportKind::Mock);
        assert_eq!(select_transport(&capability).kind(), TransportKind::Mock);
    }

    #[tokio::test]
    async fn test_runtime_selects_network() {
        let capability = HostCapability::detect(&NetworkConfig::default());
        assert_eq!(capability.transport_kind(), TransportKind::Network);
        assert_eq!(select_transport(&capability).kind(), TransportKind::Network);
    }

    #[tokio::test]
    async fn test_disabled_network_selects_mock() {
        let config = NetworkConfig {
            enabled: false,
            ..Default::default()
        };
        let capability = HostCapability::detect(&config);
        assert_eq!(capability.transport_kind(), TransportKind::Mock);
    }

    #[test]
    fn test_context_from_config() {
        let config = ClientConfig::default();
        let context = HttpContext::from_config(&config);
        assert_eq!(context.api_host(), "http://localhost:3000");
        assert_eq!(context.transport().kind(), TransportKind::Mock);
    }

    #[test]
    fn test_offline_context() {
        let context = HttpContext::offline("http://example.com");
        assert_eq!(context.api_host(), "http://example.com");
        assert_eq!(context.capability().transport_kind(), TransportKind::Mock);
    }
}
