//! Run command handler

use super::utils::dispatch;
use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::{redaction, timing::Timer};
use crate::output::OutputWriter;
use netxhr_core::{HttpContext, RequestOptions, RequestSpec};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, instrument};

/// Load a request description from a JSON or YAML file
pub fn load_request_spec(path: &Path) -> Result<RequestSpec> {
    if !path.exists() {
        error!("Request file not found: {}", path.display());
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;

    let is_yaml = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false);

    if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| {
            debug!(error = %e, "Request file is not valid YAML");
            Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "YAML request".to_string(),
            }
        })
    } else {
        serde_json::from_str(&content).map_err(|e| {
            debug!(error = %e, "Request file is not valid JSON");
            Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "JSON request".to_string(),
            }
        })
    }
}

/// Handle the run command
#[instrument(skip_all, fields(file = %args.request_file.display()))]
pub async fn handle_run(args: RunArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("run_command", &format!("file: {}", args.request_file.display()));
    info!("Starting run command execution");

    let spec = load_request_spec(&args.request_file)?;
    debug!(
        method = spec.method.as_deref().unwrap_or("GET"),
        url = spec.url.as_deref().unwrap_or_default(),
        headers = ?redaction::redact_headers(&spec.headers),
        "Loaded request file"
    );

    let mut config = config.clone();
    config.apply_target(&args.target);
    let context = HttpContext::from_config(&config.client);

    let response = dispatch(&context, RequestOptions::from(spec), None, output).await?;

    if let Some(save_path) = &args.save_to {
        fs::write(save_path, &response.response_text)?;
        info!(path = %save_path.display(), "Response saved");
        output.success(&format!("✓ Response saved to {}", save_path.display()))?;
        return Ok(());
    }

    output.response(&response, args.pretty)
}
