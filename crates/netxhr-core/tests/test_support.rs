//! Shared test support utilities for integration tests

#![allow(dead_code)]

use netxhr_core::http::{
    FailureKind, OnError, OnLoad, Response, Transport, TransportError, TransportKind,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One call observed by a [`RecordingTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Open { method: String, url: String },
    Header { name: String, value: String },
    Send { body: Option<String> },
}

/// How a [`RecordingTransport`] completes `send`
#[derive(Debug, Clone)]
pub enum Completion {
    /// Invoke `onload` inside `send`
    Load(Response),
    /// Invoke `onerror` inside `send`
    Fail(TransportError),
    /// Keep both callbacks until the test settles them
    Hold,
}

#[derive(Default)]
struct Slots {
    onload: Option<OnLoad>,
    onerror: Option<OnError>,
}

/// Transport that records every call it receives
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<Call>>>,
    slots: Arc<Mutex<Slots>>,
    completion: Completion,
}

/// Test-side view of a [`RecordingTransport`] after it was moved into a request
#[derive(Clone)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
    slots: Arc<Mutex<Slots>>,
}

impl RecordingTransport {
    pub fn new(completion: Completion) -> (Box<dyn Transport>, Recorder) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let slots = Arc::new(Mutex::new(Slots::default()));
        let transport = Self {
            calls: calls.clone(),
            slots: slots.clone(),
            completion,
        };
        (Box::new(transport), Recorder { calls, slots })
    }
}

impl Transport for RecordingTransport {
    fn open(&mut self, method: &str, url: &str) {
        self.calls.lock().unwrap().push(Call::Open {
            method: method.to_string(),
            url: url.to_string(),
        });
    }

    fn set_request_header(&mut self, name: &str, value: &str) {
        self.calls.lock().unwrap().push(Call::Header {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn set_onload(&mut self, callback: OnLoad) {
        self.slots.lock().unwrap().onload = Some(callback);
    }

    fn set_onerror(&mut self, callback: OnError) {
        self.slots.lock().unwrap().onerror = Some(callback);
    }

    fn send(&mut self, body: Option<String>) {
        self.calls.lock().unwrap().push(Call::Send { body });

        match self.completion.clone() {
            Completion::Load(response) => {
                let onload = self.slots.lock().unwrap().onload.take();
                if let Some(onload) = onload {
                    onload(response);
                }
            }
            Completion::Fail(failure) => {
                let onerror = self.slots.lock().unwrap().onerror.take();
                if let Some(onerror) = onerror {
                    onerror(failure);
                }
            }
            Completion::Hold => {}
        }
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Mock
    }
}

impl Recorder {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// The single `open` call, if exactly one was made
    pub fn opened(&self) -> Option<(String, String)> {
        let opens: Vec<_> = self
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Open { method, url } => Some((method, url)),
                _ => None,
            })
            .collect();
        match opens.as_slice() {
            [single] => Some(single.clone()),
            _ => None,
        }
    }

    /// Every value set for a header name, in call order
    pub fn header_values(&self, name: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Header { name: n, value } if n == name => Some(value),
                _ => None,
            })
            .collect()
    }

    /// Body of the single `send` call
    pub fn sent_body(&self) -> Option<Option<String>> {
        self.calls().into_iter().find_map(|call| match call {
            Call::Send { body } => Some(body),
            _ => None,
        })
    }

    /// Settle a held request successfully
    pub fn complete(&self, response: Response) -> bool {
        let onload = self.slots.lock().unwrap().onload.take();
        match onload {
            Some(onload) => {
                onload(response);
                true
            }
            None => false,
        }
    }

    /// Settle a held request with a failure
    pub fn fail(&self, failure: TransportError) -> bool {
        let onerror = self.slots.lock().unwrap().onerror.take();
        match onerror {
            Some(onerror) => {
                onerror(failure);
                true
            }
            None => false,
        }
    }
}

/// A plain 200 response with the given body
pub fn ok_response(body: &str) -> Response {
    Response {
        status: 200,
        status_text: "OK".to_string(),
        headers: HashMap::new(),
        response_text: body.to_string(),
    }
}

/// A connection failure for the given URL
pub fn connect_failure(location: &str) -> TransportError {
    TransportError::new(FailureKind::Connect, location, "connection refused")
}
