//! Request facade
//!
//! A [`Request`] is created per logical call, configured with `open` and
//! `set_request_header`, then sent once. `send` finalizes the URL and body,
//! pushes method, URL and headers onto the bound transport, hands over the
//! completion callbacks and delegates. Completion is entirely up to the
//! transport.
//!
//! # Example
//!
//! ```no_run
//! use netxhr_core::http::{HttpContext, Request, RequestOptions};
//! use serde_json::json;
//!
//! let context = HttpContext::offline("http://localhost:3000");
//! let mut request = Request::new(
//!     &context,
//!     RequestOptions::new()
//!         .url("/api/user")
//!         .data(json!({"id": 1234}))
//!         .onload(|response| println!("{}", response.response_text)),
//! );
//! request.send(None);
//! ```

use crate::http::error::TransportError;
use crate::http::query::to_query_string;
use crate::http::selector::HttpContext;
use crate::http::transport::{OnError, OnLoad, Response, Transport, TransportKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, error};

/// Method used when none is configured
pub const DEFAULT_METHOD: &str = "GET";

/// Unsent request data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestData {
    /// Already serialized body, sent verbatim
    Text(String),
    /// Structured value: folded into the query string for GET when it is a
    /// mapping, otherwise serialized to JSON at send time
    Structured(Value),
}

impl RequestData {
    /// Null and empty text count as "no data"
    fn is_empty(&self) -> bool {
        match self {
            RequestData::Text(text) => text.is_empty(),
            RequestData::Structured(value) => value.is_null(),
        }
    }

    /// Body text as it would be handed to the transport
    pub fn to_body(&self) -> String {
        match self {
            RequestData::Text(text) => text.clone(),
            RequestData::Structured(value) => value.to_string(),
        }
    }
}

impl From<Value> for RequestData {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => RequestData::Text(text),
            other => RequestData::Structured(other),
        }
    }
}

impl From<Map<String, Value>> for RequestData {
    fn from(map: Map<String, Value>) -> Self {
        RequestData::Structured(Value::Object(map))
    }
}

impl From<String> for RequestData {
    fn from(text: String) -> Self {
        RequestData::Text(text)
    }
}

impl From<&str> for RequestData {
    fn from(text: &str) -> Self {
        RequestData::Text(text.to_string())
    }
}

/// Construction overrides; every field left unset keeps its default
#[derive(Default)]
pub struct RequestOptions {
    pub host: Option<String>,
    pub method: Option<String>,
    pub url: Option<String>,
    pub data: Option<RequestData>,
    pub headers: Option<HashMap<String, String>>,
    pub onload: Option<OnLoad>,
    pub onerror: Option<OnError>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn data(mut self, data: impl Into<RequestData>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Replace the whole header map
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Add one header to the header map
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn onload<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(Response) + Send + 'static,
    {
        self.onload = Some(Box::new(callback));
        self
    }

    pub fn onerror<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(TransportError) + Send + 'static,
    {
        self.onerror = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("host", &self.host)
            .field("method", &self.method)
            .field("url", &self.url)
            .field("data", &self.data)
            .field("headers", &self.headers)
            .field("onload", &self.onload.is_some())
            .field("onerror", &self.onerror.is_some())
            .finish()
    }
}

/// Serializable subset of [`RequestOptions`], for requests described in files.
/// Unknown fields are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequestSpec {
    pub host: Option<String>,
    pub method: Option<String>,
    pub url: Option<String>,
    pub data: Option<RequestData>,
    pub headers: HashMap<String, String>,
}

impl From<RequestSpec> for RequestOptions {
    fn from(spec: RequestSpec) -> Self {
        Self {
            host: spec.host,
            method: spec.method,
            url: spec.url,
            data: spec.data,
            headers: if spec.headers.is_empty() {
                None
            } else {
                Some(spec.headers)
            },
            onload: None,
            onerror: None,
        }
    }
}

/// Where a request is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestState {
    /// Constructed, not yet touched
    Created,
    /// `open` or `set_request_header` called
    Configuring,
    /// Handed to the transport
    Sent,
}

fn default_onload() -> OnLoad {
    Box::new(|_| {})
}

fn default_onerror() -> OnError {
    Box::new(|failure: TransportError| {
        error!(
            location = %failure.location,
            status = ?failure.status,
            kind = ?failure.kind,
            "XHR error: {}",
            failure.status_text.as_deref().unwrap_or(&failure.message)
        );
    })
}

/// A single logical HTTP request bound to its own transport
pub struct Request {
    host: String,
    method: String,
    url: Option<String>,
    data: Option<RequestData>,
    headers: HashMap<String, String>,
    onload: OnLoad,
    onerror: OnError,
    transport: Box<dyn Transport>,
    state: RequestState,
}

impl Request {
    /// Create a request whose host defaults to the context's API host and
    /// whose transport is selected from the context's capability
    pub fn new(context: &HttpContext, options: RequestOptions) -> Self {
        Self::with_transport(context.api_host(), options, context.transport())
    }

    /// Create a request bound to an explicit transport
    pub fn with_transport(
        default_host: &str,
        options: RequestOptions,
        transport: Box<dyn Transport>,
    ) -> Self {
        Self {
            host: options.host.unwrap_or_else(|| default_host.to_string()),
            method: options.method.unwrap_or_else(|| DEFAULT_METHOD.to_string()),
            url: options.url,
            data: options.data,
            headers: options.headers.unwrap_or_default(),
            onload: options.onload.unwrap_or_else(default_onload),
            onerror: options.onerror.unwrap_or_else(default_onerror),
            transport,
            state: RequestState::Created,
        }
    }

    /// Update method and URL; empty values leave the current ones untouched
    pub fn open(&mut self, method: &str, url: &str) {
        if !method.is_empty() {
            self.method = method.to_string();
        }
        if !url.is_empty() {
            self.url = Some(url.to_string());
        }
        self.mark_configuring();
    }

    /// Store a header to apply at send time; the last value for a name wins
    pub fn set_request_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
        self.mark_configuring();
    }

    /// Replace the success callback
    pub fn set_onload<F>(&mut self, callback: F)
    where
        F: FnOnce(Response) + Send + 'static,
    {
        self.onload = Box::new(callback);
    }

    /// Replace the failure callback
    pub fn set_onerror<F>(&mut self, callback: F)
    where
        F: FnOnce(TransportError) + Send + 'static,
    {
        self.onerror = Box::new(callback);
    }

    /// Finalize and send the request.
    ///
    /// The current callbacks are handed to the transport here; replacing
    /// them afterwards does not affect this send. A request is meant to be
    /// sent once.
    pub fn send(&mut self, data: Option<RequestData>) {
        if let Some(data) = data.filter(|d| !d.is_empty()) {
            self.data = Some(data);
        }

        if self.method == "GET" {
            if let Some(RequestData::Structured(Value::Object(params))) = &self.data {
                let query = to_query_string(params);
                let url = self.url.as_deref().unwrap_or_default();
                self.url = Some(format!("{}?{}", url, query));
                self.data = None;
            }
        }

        let full_url = format!("{}{}", self.host, self.url.as_deref().unwrap_or_default());
        debug!(method = %self.method, url = %full_url, "Preparing request");
        self.transport.open(&self.method, &full_url);

        if self.method == "PUT" || self.method == "POST" {
            self.transport
                .set_request_header("Content-Type", "application/json");
        }

        for (name, value) in &self.headers {
            self.transport.set_request_header(name, value);
        }

        let onload = std::mem::replace(&mut self.onload, default_onload());
        let onerror = std::mem::replace(&mut self.onerror, default_onerror());
        self.transport.set_onload(onload);
        self.transport.set_onerror(onerror);

        if let Some(RequestData::Structured(value)) = &self.data {
            self.data = Some(RequestData::Text(value.to_string()));
        }

        let body = self.data.as_ref().map(RequestData::to_body);
        self.state = RequestState::Sent;
        self.transport.send(body);
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn data(&self) -> Option<&RequestData> {
        self.data.as_ref()
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Kind of the transport bound at construction
    pub fn transport_kind(&self) -> TransportKind {
        self.transport.kind()
    }

    fn mark_configuring(&mut self) {
        if self.state == RequestState::Created {
            self.state = RequestState::Configuring;
        }
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("host", &self.host)
            .field("method", &self.method)
            .field("url", &self.url)
            .field("data", &self.data)
            .field("headers", &self.headers)
            .field("transport", &self.transport.kind())
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn offline_request(options: RequestOptions) -> Request {
        Request::new(&HttpContext::offline("http://localhost:3000"), options)
    }

    #[test]
    fn test_defaults() {
        let request = offline_request(RequestOptions::new());
        assert_eq!(request.host(), "http://localhost:3000");
        assert_eq!(request.method(), "GET");
        assert_eq!(request.url(), None);
        assert_eq!(request.data(), None);
        assert!(request.headers().is_empty());
        assert_eq!(request.state(), RequestState::Created);
        assert_eq!(request.transport_kind(), TransportKind::Mock);
    }

    #[test]
    fn test_host_override_takes_precedence() {
        let request = offline_request(RequestOptions::new().host("http://example.com"));
        assert_eq!(request.host(), "http://example.com");
    }

    #[test]
    fn test_open_partial_updates() {
        let mut request = offline_request(RequestOptions::new().url("/a"));
        request.open("POST", "");
        assert_eq!(request.method(), "POST");
        assert_eq!(request.url(), Some("/a"));

        request.open("", "/b");
        assert_eq!(request.method(), "POST");
        assert_eq!(request.url(), Some("/b"));
        assert_eq!(request.state(), RequestState::Configuring);
    }

    #[test]
    fn test_header_last_write_wins() {
        let mut request = offline_request(RequestOptions::new());
        request.set_request_header("X-Test", "1");
        request.set_request_header("X-Test", "2");
        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.headers()["X-Test"], "2");
    }

    #[test]
    fn test_get_folds_data_into_query() {
        let mut request = offline_request(
            RequestOptions::new()
                .url("/api/user")
                .data(json!({"id": 1234})),
        );
        request.send(None);

        assert_eq!(request.url(), Some("/api/user?id=1234"));
        assert_eq!(request.data(), None);
        assert_eq!(request.state(), RequestState::Sent);
    }

    #[test]
    fn test_get_with_text_data_is_not_folded() {
        let mut request = offline_request(RequestOptions::new().url("/api/user"));
        request.send(Some("raw".into()));

        assert_eq!(request.url(), Some("/api/user"));
        assert_eq!(request.data(), Some(&RequestData::Text("raw".to_string())));
    }

    #[test]
    fn test_lowercase_get_is_not_folded() {
        let mut request = offline_request(
            RequestOptions::new()
                .method("get")
                .url("/api/user")
                .data(json!({"id": 1})),
        );
        request.send(None);

        assert_eq!(request.url(), Some("/api/user"));
        assert_eq!(request.data(), Some(&RequestData::Text(r#"{"id":1}"#.to_string())));
    }

    #[test]
    fn test_post_serializes_structured_data() {
        let mut request = offline_request(RequestOptions::new().method("POST").url("/api/user"));
        request.send(Some(json!({"foo": {"bar": 1}}).into()));

        assert_eq!(request.url(), Some("/api/user"));
        assert_eq!(
            request.data(),
            Some(&RequestData::Text(r#"{"foo":{"bar":1}}"#.to_string()))
        );
    }

    #[test]
    fn test_send_without_data_keeps_stored_data() {
        let mut request = offline_request(
            RequestOptions::new()
                .method("PUT")
                .data(json!({"name": "x"})),
        );
        request.send(None);
        assert_eq!(request.data(), Some(&RequestData::Text(r#"{"name":"x"}"#.to_string())));
    }

    #[test]
    fn test_send_with_empty_text_keeps_stored_data() {
        let mut request = offline_request(
            RequestOptions::new()
                .method("POST")
                .data(json!({"a": 1})),
        );
        request.send(Some(RequestData::Text(String::new())));
        assert_eq!(request.data(), Some(&RequestData::Text(r#"{"a":1}"#.to_string())));
    }

    #[test]
    fn test_send_with_null_keeps_stored_data() {
        let mut request = offline_request(RequestOptions::new().method("PUT").data("name=ada"));
        request.send(Some(Value::Null.into()));
        assert_eq!(request.data(), Some(&RequestData::Text("name=ada".to_string())));
    }

    #[test]
    fn test_mock_onload_fires_synchronously() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let loads = seen.clone();
        let errors = seen.clone();

        let mut request = offline_request(
            RequestOptions::new()
                .url("/api/user")
                .onload(move |response| loads.lock().unwrap().push(response.response_text))
                .onerror(move |_| errors.lock().unwrap().push("error".to_string())),
        );
        request.send(None);

        assert_eq!(*seen.lock().unwrap(), vec![r#"{"success": 1}"#.to_string()]);
    }

    #[test]
    fn test_set_onload_replaces_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let first = seen.clone();
        let second = seen.clone();

        let mut request = offline_request(
            RequestOptions::new().onload(move |_| first.lock().unwrap().push("first")),
        );
        request.set_onload(move |_| second.lock().unwrap().push("second"));
        request.send(None);

        assert_eq!(*seen.lock().unwrap(), vec!["second"]);
    }

    #[test]
    fn test_request_spec_rejects_unknown_fields() {
        let result: Result<RequestSpec, _> = serde_json::from_value(json!({
            "url": "/api/user",
            "callback": "nope"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_request_spec_into_options() {
        let spec: RequestSpec = serde_json::from_value(json!({
            "method": "POST",
            "url": "/api/user",
            "data": {"id": 1},
            "headers": {"X-Test": "1"}
        }))
        .unwrap();
        let request = offline_request(spec.into());

        assert_eq!(request.method(), "POST");
        assert_eq!(request.url(), Some("/api/user"));
        assert_eq!(request.data(), Some(&RequestData::Structured(json!({"id": 1}))));
        assert_eq!(request.headers()["X-Test"], "1");
    }

    #[test]
    fn test_string_value_becomes_text() {
        assert_eq!(
            RequestData::from(json!("already encoded")),
            RequestData::Text("already encoded".to_string())
        );
    }
}
