//! Shared utilities for command handlers

use crate::error::{Error, Result};
use crate::output::OutputWriter;
use netxhr_core::{HttpContext, Request, RequestData, RequestOptions, Response, TransportError};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing::debug;

type Outcome = std::result::Result<Response, TransportError>;

/// Parse a "Name: value" header argument
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| Error::invalid_args(format!("Header must look like 'Name: value', got '{}'", raw)))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid_args(format!("Header name is empty in '{}'", raw)));
    }

    Ok((name.to_string(), value.trim().to_string()))
}

/// Interpret `--data`: valid JSON is sent structured, anything else as text
pub fn parse_data(raw: &str) -> RequestData {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => RequestData::from(value),
        Err(_) => RequestData::Text(raw.to_string()),
    }
}

/// Send a request and wait until one of its callbacks fires
///
/// The mock transport settles inside `send`; the network transport settles
/// from a task on the runtime.
pub async fn dispatch(
    context: &HttpContext,
    options: RequestOptions,
    data: Option<RequestData>,
    output: &OutputWriter,
) -> Result<Response> {
    let (tx, rx) = oneshot::channel::<Outcome>();
    let slot = Arc::new(Mutex::new(Some(tx)));
    let error_slot = Arc::clone(&slot);

    let options = options
        .onload(move |response| settle(&slot, Ok(response)))
        .onerror(move |failure| settle(&error_slot, Err(failure)));

    {
        let mut request = Request::new(context, options);
        debug!(
            method = request.method(),
            host = request.host(),
            url = request.url().unwrap_or_default(),
            transport = %request.transport_kind(),
            "Dispatching request"
        );
        request.send(data);
    }

    let spinner = output.spinner("Waiting for response...");
    let outcome = rx.await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match outcome {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(failure)) => Err(Error::Transport(failure)),
        Err(_) => Err(Error::Unsettled),
    }
}

fn settle(slot: &Mutex<Option<oneshot::Sender<Outcome>>>, outcome: Outcome) {
    if let Ok(mut guard) = slot.lock() {
        if let Some(tx) = guard.take() {
            // The receiver is gone only if the command was abandoned
            let _ = tx.send(outcome);
        }
    }
}
