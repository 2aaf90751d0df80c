//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigShowArgs, OutputFormat};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use serde::Serialize;

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
        ConfigAction::Host => handle_config_host(config, output),
        ConfigAction::Paths => handle_config_paths(output),
    }
}

/// Handle config show subcommand
fn handle_config_show(args: ConfigShowArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let content = match args.format {
        ConfigFormat::Toml => toml::to_string_pretty(config)
            .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e)))?,
        ConfigFormat::Json => serde_json::to_string_pretty(config)
            .map_err(|e| Error::config(format!("Failed to serialize as JSON: {}", e)))?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)
            .map_err(|e| Error::config(format!("Failed to serialize as YAML: {}", e)))?,
    };

    output.section("Effective Configuration")?;
    output.writeln(content.trim_end())
}

#[derive(Serialize)]
struct HostReport<'a> {
    environment: String,
    api_host: &'a str,
    network_enabled: bool,
}

/// Handle config host subcommand
fn handle_config_host(config: &Config, output: &mut OutputWriter) -> Result<()> {
    let client = &config.client;

    if output.format() == OutputFormat::Human {
        return output.writeln(client.api_host());
    }

    output.data(&HostReport {
        environment: client.environment.to_string(),
        api_host: client.api_host(),
        network_enabled: client.network.enabled,
    })
}

#[derive(Serialize)]
struct PathEntry {
    path: String,
    exists: bool,
}

/// Handle config paths subcommand
fn handle_config_paths(output: &mut OutputWriter) -> Result<()> {
    let entries: Vec<PathEntry> = Config::default_config_paths()
        .into_iter()
        .map(|path| PathEntry {
            exists: path.exists(),
            path: path.display().to_string(),
        })
        .collect();

    if output.format() != OutputFormat::Human {
        return output.data(&entries);
    }

    output.section("Configuration Search Order")?;
    for entry in entries {
        let marker = if entry.exists { "✓" } else { " " };
        output.writeln(&format!("{} {}", marker, entry.path))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn run(action: ConfigAction, format: OutputFormat) -> String {
        let captured = Captured::default();
        let mut output = OutputWriter::with_writer(format, false, false, 0, Box::new(captured.clone()));
        handle_config(ConfigArgs { action }, &Config::default(), &mut output).unwrap();
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_show_toml() {
        let text = run(
            ConfigAction::Show(ConfigShowArgs {
                format: ConfigFormat::Toml,
            }),
            OutputFormat::Human,
        );
        assert!(text.contains("[client]"));
        assert!(text.contains("environment = \"local\""));
    }

    #[test]
    fn test_host_human() {
        assert_eq!(run(ConfigAction::Host, OutputFormat::Human), "http://localhost:3000\n");
    }

    #[test]
    fn test_host_json() {
        let text = run(ConfigAction::Host, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["environment"], "local");
        assert_eq!(value["network_enabled"], true);
    }

    #[test]
    fn test_paths_json_lists_project_files_first() {
        let text = run(ConfigAction::Paths, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value[0]["path"], ".netxhr.toml");
    }
}
