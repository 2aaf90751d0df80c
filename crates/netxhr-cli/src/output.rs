//! Output formatting and writing utilities
//!
//! This module provides utilities for writing settled responses and
//! structured data in human-readable, JSON or YAML form, along with
//! progress indicators for in-flight requests.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use netxhr_core::Response;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use tracing::trace;

/// Trait for formatting output in the selected format
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a settled response
    fn format_response(&self, response: &Response, pretty: bool) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_response(&self, response: &Response, pretty: bool) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(response_body(response, pretty)),
            _ => self.format(response),
        }
    }
}

/// Response body, re-indented when it is JSON and `pretty` is set
pub fn response_body(response: &Response, pretty: bool) -> String {
    if pretty {
        if let Ok(value) = response.json() {
            if let Ok(indented) = serde_json::to_string_pretty(&value) {
                return indented;
            }
        }
    }
    response.response_text.clone()
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && std::io::stderr().is_terminal(),
            quiet,
            verbose,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            show_progress: false, // No progress bars with custom writers
            quiet,
            verbose,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Disable spinners regardless of the terminal
    pub fn set_progress(&mut self, enabled: bool) {
        self.show_progress = self.show_progress && enabled;
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;

        if self.format == OutputFormat::Yaml {
            // serde_yaml already ends with a newline
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    /// Write a settled response
    ///
    /// In human format the status line goes first (headers too when
    /// verbose), followed by the body. Quiet mode prints the body only.
    pub fn response(&mut self, response: &Response, pretty: bool) -> Result<()> {
        trace!(status = response.status, bytes = response.response_text.len(), "Writing response");

        if self.format != OutputFormat::Human {
            return self.data(response);
        }

        if !self.quiet {
            let status_line = format!("{} {}", response.status, response.status_text);
            if self.use_color {
                self.writeln(&status_line.green().bold().to_string())?;
            } else {
                self.writeln(&status_line)?;
            }

            if self.verbose > 0 {
                let mut headers: Vec<_> = response.headers.iter().collect();
                headers.sort();
                for (name, value) in headers {
                    if self.use_color {
                        self.writeln(&format!("{}: {}", name.dimmed(), value))?;
                    } else {
                        self.writeln(&format!("{}: {}", name, value))?;
                    }
                }
            }
        }

        let body = self.format.format_response(response, pretty)?;
        self.writeln(&body)
    }

    /// Create a spinner for indeterminate progress
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(default_spinner_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

/// Helper function to create a spinner style
pub fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
