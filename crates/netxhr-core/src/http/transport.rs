//! The transport capability set
//!
//! A transport performs one request: it is opened with a method and a full
//! URL, receives headers, gets its completion callbacks wired, and is sent
//! once. Exactly one of the two callbacks fires, at a time chosen by the
//! transport. Callers must not assume completion is synchronous.

use crate::http::TransportError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Success callback, invoked at most once with the response
pub type OnLoad = Box<dyn FnOnce(Response) + Send + 'static>;

/// Failure callback, invoked at most once with the failure
pub type OnError = Box<dyn FnOnce(TransportError) + Send + 'static>;

/// Result handed to `onload`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Canonical reason phrase for `status`
    pub status_text: String,
    /// Response headers, lower-cased names
    pub headers: HashMap<String, String>,
    /// Raw response body
    pub response_text: String,
}

impl Response {
    /// Parse the raw body as JSON
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.response_text)
    }
}

/// Which implementation backs a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Real network client
    Network,
    /// In-process stand-in that always succeeds
    Mock,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Network => write!(f, "network"),
            TransportKind::Mock => write!(f, "mock"),
        }
    }
}

/// Operations every transport provides
pub trait Transport: Send {
    /// Set the method and full URL of the request
    fn open(&mut self, method: &str, url: &str);

    /// Set a request header, replacing any earlier value for `name`
    fn set_request_header(&mut self, name: &str, value: &str);

    /// Fill the success slot
    fn set_onload(&mut self, callback: OnLoad);

    /// Fill the failure slot
    fn set_onerror(&mut self, callback: OnError);

    /// Send the request with an optional serialized body
    fn send(&mut self, body: Option<String>);

    /// Which implementation this is
    fn kind(&self) -> TransportKind;
}

impl fmt::Debug for dyn Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport").field("kind", &self.kind()).finish()
    }
}
