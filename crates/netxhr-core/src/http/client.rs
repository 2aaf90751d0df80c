//! Network transport backed by reqwest
//!
//! `send` hands the request to the tokio runtime and returns immediately.
//! Completion is delivered from the spawned task. Anything that prevents the
//! request from being built (bad method, URL or header) is reported through
//! `onerror` rather than returned.

use crate::config::NetworkConfig;
use crate::http::error::{FailureKind, TransportError};
use crate::http::transport::{OnError, OnLoad, Response, Transport, TransportKind};
use crate::Result;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client as ReqwestClient, Method, Url};
use std::collections::HashMap;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// Build the shared reqwest client from network settings
pub fn build_client(config: &NetworkConfig) -> Result<ReqwestClient> {
    let mut builder = ReqwestClient::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .danger_accept_invalid_certs(!config.validate_tls);

    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }

    builder.build().map_err(|e| crate::Error::HttpClient {
        message: format!("Failed to create HTTP client: {}", e),
        source: Some(Box::new(e)),
    })
}

/// Transport performing a real HTTP request on a tokio runtime
pub struct HttpTransport {
    /// Underlying reqwest client
    client: ReqwestClient,
    /// Runtime the request is spawned on
    handle: Handle,
    method: Option<String>,
    url: Option<String>,
    headers: Vec<(String, String)>,
    onload: Option<OnLoad>,
    onerror: Option<OnError>,
}

impl HttpTransport {
    pub fn new(client: ReqwestClient, handle: Handle) -> Self {
        Self {
            client,
            handle,
            method: None,
            url: None,
            headers: Vec::new(),
            onload: None,
            onerror: None,
        }
    }

    /// Assemble the reqwest request from what was opened and set
    fn build_request(&self, body: Option<String>) -> std::result::Result<reqwest::Request, TransportError> {
        let location = self.url.clone().unwrap_or_default();
        let method_str = self.method.as_deref().unwrap_or("GET");

        let method = Method::from_bytes(method_str.as_bytes()).map_err(|_| {
            TransportError::new(
                FailureKind::Build,
                &location,
                format!("Invalid HTTP method: {}", method_str),
            )
        })?;

        let url = Url::parse(&location).map_err(|e| {
            TransportError::new(
                FailureKind::Build,
                &location,
                format!("Invalid URL: {}", e),
            )
        })?;

        let mut request = reqwest::Request::new(method, url);

        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                TransportError::new(
                    FailureKind::Build,
                    &location,
                    format!("Invalid header name: {}", name),
                )
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|_| {
                TransportError::new(
                    FailureKind::Build,
                    &location,
                    format!("Invalid value for header {}", name),
                )
            })?;
            request.headers_mut().insert(header_name, header_value);
        }

        if let Some(body) = body {
            *request.body_mut() = Some(body.into());
        }

        Ok(request)
    }
}

/// Execute a built request and turn the outcome into a response or failure
async fn execute(
    client: &ReqwestClient,
    request: reqwest::Request,
    location: &str,
) -> std::result::Result<Response, TransportError> {
    let response = client
        .execute(request)
        .await
        .map_err(|e| TransportError::from_request_error(location, e))?;

    let status = response.status();
    let headers: HashMap<String, String> = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let body = response
        .text()
        .await
        .map_err(|e| TransportError::from_request_error(location, e))?;

    if status.is_client_error() || status.is_server_error() {
        return Err(TransportError::from_status(location, status, body));
    }

    Ok(Response {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or("").to_string(),
        headers,
        response_text: body,
    })
}

impl Transport for HttpTransport {
    fn open(&mut self, method: &str, url: &str) {
        self.method = Some(method.to_string());
        self.url = Some(url.to_string());
    }

    fn set_request_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    fn set_onload(&mut self, callback: OnLoad) {
        self.onload = Some(callback);
    }

    fn set_onerror(&mut self, callback: OnError) {
        self.onerror = Some(callback);
    }

    fn send(&mut self, body: Option<String>) {
        let onload = self.onload.take();
        let onerror = self.onerror.take();
        let location = self.url.clone().unwrap_or_default();
        let request = self.build_request(body);
        let client = self.client.clone();

        info!(
            method = self.method.as_deref().unwrap_or("GET"),
            url = %location,
            "Sending request"
        );

        self.handle.spawn(async move {
            let outcome = match request {
                Ok(request) => execute(&client, request, &location).await,
                Err(failure) => Err(failure),
            };

            match outcome {
                Ok(response) => {
                    debug!(url = %location, status = response.status, "Request completed");
                    if let Some(onload) = onload {
                        onload(response);
                    }
                }
                Err(failure) => {
                    warn!(url = %location, kind = ?failure.kind, "Request failed");
                    if let Some(onerror) = onerror {
                        onerror(failure);
                    }
                }
            }
        });
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Network
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_from_defaults() {
        let config = NetworkConfig::default();
        assert!(build_client(&config).is_ok());
    }

    #[tokio::test]
    async fn test_build_request_applies_headers_and_body() {
        let client = build_client(&NetworkConfig::default()).unwrap();
        let mut transport = HttpTransport::new(client, Handle::current());
        transport.open("PUT", "http://localhost:3000/api/user");
        transport.set_request_header("Content-Type", "application/json");
        transport.set_request_header("X-Test", "1");
        transport.set_request_header("content-type", "text/plain");

        let request = transport.build_request(Some(r#"{"a":1}"#.to_string())).unwrap();
        assert_eq!(*request.method(), Method::PUT);
        assert_eq!(request.url().as_str(), "http://localhost:3000/api/user");
        assert_eq!(request.headers()["x-test"], "1");
        assert_eq!(request.headers()["content-type"], "text/plain");
        assert_eq!(
            request.body().and_then(|b| b.as_bytes()),
            Some(br#"{"a":1}"#.as_slice())
        );
    }

    #[tokio::test]
    async fn test_invalid_url_is_a_build_failure() {
        let client = build_client(&NetworkConfig::default()).unwrap();
        let mut transport = HttpTransport::new(client, Handle::current());
        transport.open("GET", "/api/user");

        let failure = transport.build_request(None).unwrap_err();
        assert_eq!(failure.kind, FailureKind::Build);
        assert_eq!(failure.location, "/api/user");
    }

    #[tokio::test]
    async fn test_invalid_method_is_a_build_failure() {
        let client = build_client(&NetworkConfig::default()).unwrap();
        let mut transport = HttpTransport::new(client, Handle::current());
        transport.open("BAD METHOD", "http://localhost:3000/");

        let failure = transport.build_request(None).unwrap_err();
        assert_eq!(failure.kind, FailureKind::Build);
        assert!(failure.message.contains("BAD METHOD"));
    }
}
