//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod completions;
mod config;
mod run;
mod send;
mod utils;

pub use completions::handle_completions;
pub use config::handle_config;
pub use run::handle_run;
pub use send::handle_send;
