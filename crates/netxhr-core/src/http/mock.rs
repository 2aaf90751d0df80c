//! Mock transport for environments without a network client
//!
//! Every request succeeds synchronously inside `send` with the canonical
//! payload `{"success": 1}`. Nothing is recorded and `onerror` never fires.

use crate::http::transport::{OnError, OnLoad, Response, Transport, TransportKind};
use std::collections::HashMap;
use tracing::debug;

/// Body of every mock response
pub const MOCK_RESPONSE_TEXT: &str = r#"{"success": 1}"#;

/// Transport that answers every request with a fixed success response
#[derive(Default)]
pub struct MockTransport {
    onload: Option<OnLoad>,
    onerror: Option<OnError>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// The response handed to `onload`
    pub fn canned_response() -> Response {
        Response {
            status: 200,
            status_text: "OK".to_string(),
            headers: HashMap::new(),
            response_text: MOCK_RESPONSE_TEXT.to_string(),
        }
    }
}

impl Transport for MockTransport {
    fn open(&mut self, _method: &str, _url: &str) {}

    fn set_request_header(&mut self, _name: &str, _value: &str) {}

    fn set_onload(&mut self, callback: OnLoad) {
        self.onload = Some(callback);
    }

    fn set_onerror(&mut self, callback: OnError) {
        self.onerror = Some(callback);
    }

    fn send(&mut self, _body: Option<String>) {
        // The error slot is held but never used.
        self.onerror.take();

        if let Some(onload) = self.onload.take() {
            debug!("Mock transport completing request");
            onload(Self::canned_response());
        }
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Mock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_send_invokes_onload_synchronously() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();

        let mut transport = MockTransport::new();
        transport.open("GET", "http://localhost:3000/api/user");
        transport.set_request_header("X-Test", "1");
        transport.set_onload(Box::new(move |response| {
            *sink.lock().unwrap() = Some(response);
        }));
        transport.send(None);

        let response = seen.lock().unwrap().take().expect("onload fired");
        assert_eq!(response.response_text, r#"{"success": 1}"#);
        assert_eq!(response.status, 200);
        assert_eq!(response.json().unwrap()["success"], 1);
    }

    #[test]
    fn test_onerror_never_fires() {
        let errored = Arc::new(Mutex::new(false));
        let flag = errored.clone();

        let mut transport = MockTransport::new();
        transport.set_onerror(Box::new(move |_| *flag.lock().unwrap() = true));
        transport.send(Some("{}".to_string()));

        assert!(!*errored.lock().unwrap());
    }

    #[test]
    fn test_send_without_onload_is_noop() {
        let mut transport = MockTransport::new();
        transport.send(None);
        assert_eq!(transport.kind(), TransportKind::Mock);
    }
}
