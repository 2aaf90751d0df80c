//! Send command handler

use super::utils::{dispatch, parse_data, parse_header};
use crate::cli::SendArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::{redaction, timing::Timer};
use crate::output::OutputWriter;
use netxhr_core::{HttpContext, RequestOptions};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Handle the send command
#[instrument(skip_all, fields(method = %args.method, url = %args.url))]
pub async fn handle_send(args: SendArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("send_command", &format!("{} {}", args.method, args.url));

    let mut config = config.clone();
    config.apply_target(&args.target);
    let context = HttpContext::from_config(&config.client);

    let mut headers = HashMap::new();
    for raw in &args.headers {
        let (name, value) = parse_header(raw)?;
        headers.insert(name, value);
    }
    debug!(headers = ?redaction::redact_headers(&headers), "Request headers");

    let mut options = RequestOptions::new().method(args.method.as_str()).url(args.url.as_str());
    if !headers.is_empty() {
        options = options.headers(headers);
    }
    let data = args.data.as_deref().map(parse_data);

    info!(
        host = context.api_host(),
        transport = %context.capability().transport_kind(),
        "Sending request"
    );
    let response = dispatch(&context, options, data, output).await?;

    output.response(&response, args.pretty)
}
