//! HTTP request facade over interchangeable transports
//!
//! This module provides:
//! - Query string encoding for GET data
//! - The transport capability set and its two implementations
//!   (network via reqwest, in-process mock)
//! - Transport selection from the host's capability
//! - The request facade callers configure and send

pub mod client;
pub mod error;
pub mod mock;
pub mod query;
pub mod request;
pub mod selector;
pub mod transport;

pub use client::{build_client, HttpTransport};
pub use error::{FailureKind, TransportError};
pub use mock::{MockTransport, MOCK_RESPONSE_TEXT};
pub use query::to_query_string;
pub use request::{Request, RequestData, RequestOptions, RequestSpec, RequestState};
pub use selector::{select_transport, HostCapability, HttpContext};
pub use transport::{OnError, OnLoad, Response, Transport, TransportKind};
