//! cli
//!
//! Command-line interface for driving a page store.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and set up logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Each handler opens the store for the route,
//! calls one store operation, and prints the result. All state changes
//! flow through [`crate::page::PageStore`].

pub mod args;
pub mod commands;
pub mod context;

pub use args::{Cli, Shell};
pub use context::Context;

use std::io::{self, IsTerminal};

use anyhow::{Context as _, Result};
use tracing::debug;

use crate::core::config::Config;
use crate::core::types::RoutePath;
use crate::logging::{self, LogConfig};
use crate::ui::output::Verbosity;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let log_config = LogConfig::from_verbosity(cli.verbose, cli.quiet)
        .with_format(cli.log_format)
        .with_ansi(io::stderr().is_terminal());
    if let Some(warning) = init_logging(&log_config, cli.verbose) {
        eprintln!("warning: {}", warning);
    }

    // Completion needs neither config nor registry.
    if let args::Command::Completion { shell } = cli.command {
        return commands::completion(shell);
    }

    let config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(path) = config.loaded_from() {
        debug!(path = %path.display(), "loaded config");
    }

    let ctx = Context {
        route: RoutePath::new(cli.route.as_str())?,
        config,
        registry_path: cli.registry.clone(),
        api: cli.api.clone(),
        verbosity: Verbosity::from_flags(cli.quiet, cli.verbose),
    };

    commands::dispatch(cli.command, &ctx)
}

/// Install the subscriber for this run.
///
/// A host embedding the CLI may already have installed one, which is kept.
/// That is only worth a warning when debug output was asked for.
fn init_logging(config: &LogConfig, verbose: u8) -> Option<String> {
    match logging::init(config) {
        Ok(()) => None,
        Err(e) if verbose >= 2 => Some(format!("keeping existing log subscriber: {}", e)),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_subscriber_warns_only_at_debug() {
        let config = LogConfig::default();
        let _ = init_logging(&config, 0);

        assert_eq!(init_logging(&config, 0), None);
        assert_eq!(init_logging(&config, 1), None);
        let warning = init_logging(&config, 2).unwrap();
        assert!(warning.contains("existing log subscriber"));
    }
}
