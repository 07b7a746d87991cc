//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--route <path>`: Page the command acts on
//! - `--config <file>`: Explicit config file
//! - `--registry <file>`: Tab registry file
//! - `--api <url>`: Resource base URL (overrides config)
//! - `-v` / `-q`: Log verbosity
//! - `--log-format <fmt>`: pretty, compact or json

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::logging::LogFormat;

/// Route used when `--route` is not given.
pub const DEFAULT_ROUTE: &str = "/examples/list-with-form-list";

/// pgs - drive list/detail page stores from the command line
#[derive(Parser, Debug)]
#[command(name = "pgs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Route of the page to act on
    #[arg(long, global = true, default_value = DEFAULT_ROUTE)]
    pub route: String,

    /// Config file (default: search $PAGESTORE_CONFIG, XDG, ~/.pagestore)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Tab registry file (default: ~/.pagestore/tabs.json)
    #[arg(long, global = true, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Base URL of the list/detail/save endpoints
    #[arg(long, global = true, value_name = "URL")]
    pub api: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the list query and show the rows
    #[command(
        name = "list",
        long_about = "Run the page's list query and show the rows.\n\n\
            Filters and sort given here replace the stored ones before the query \
            runs. Without them the stored query runs unchanged.",
        after_help = "\
EXAMPLES:
    pgs list
    pgs list --filter status=active --sort createdAt:desc
    pgs list --size 20"
    )]
    List {
        /// Filter as key=value (repeatable; replaces stored filters)
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,

        /// Sort as field[:asc|desc] (repeatable; replaces stored sort)
        #[arg(long = "sort", value_name = "FIELD[:DIR]")]
        sort: Vec<String>,

        /// Page size
        #[arg(long)]
        size: Option<u32>,
    },

    /// Move to another page of the list
    Page {
        /// 1-based page number
        number: u32,

        /// Page size (keeps the stored size when omitted)
        #[arg(long)]
        size: Option<u32>,
    },

    /// Select a row and open the form on it
    #[command(
        name = "select",
        after_help = "\
KEYS:
    42      row whose id is 42
    #3      fourth row, for rows without an id"
    )]
    Select {
        /// Row key: an id, or #N for a position
        key: String,

        /// Fill the form from the list row instead of fetching detail
        #[arg(long)]
        inline: bool,
    },

    /// Open an empty form for a new entity
    New,

    /// Close the form and clear the selection
    Cancel,

    /// Edit fields of the form snapshot
    #[command(
        name = "set",
        after_help = "\
EXAMPLES:
    pgs set name=kim age=31
    pgs set --json '{\"name\": \"kim\"}'"
    )]
    Set {
        /// Field assignments as key=value (values parse as JSON when possible)
        #[arg(value_name = "KEY=VALUE")]
        assignments: Vec<String>,

        /// Replace the whole form with this JSON object
        #[arg(long, conflicts_with = "assignments")]
        json: Option<String>,
    },

    /// Stage changes to the embedded sub list
    Child {
        #[command(subcommand)]
        action: ChildAction,
    },

    /// Send the form and staged sub list to the save endpoint
    Save {
        /// Print the payload instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the page state
    Show {
        /// Print the metadata document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set column widths and the list/form layout ratio
    Layout {
        /// List column widths, comma separated
        #[arg(long, value_delimiter = ',')]
        col_widths: Option<Vec<u32>>,

        /// Sub list column widths, comma separated
        #[arg(long, value_delimiter = ',')]
        child_col_widths: Option<Vec<u32>>,

        /// Flex grow ratio of the list pane
        #[arg(long)]
        flex_grow: Option<f64>,
    },

    /// Forget the page's saved state
    Reset,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Sub list actions.
#[derive(Subcommand, Debug, Clone)]
pub enum ChildAction {
    /// Append new rows (one JSON object per argument)
    Add {
        #[arg(required = true, value_name = "JSON")]
        rows: Vec<String>,
    },
    /// Replace the values of a row
    Edit {
        index: usize,
        #[arg(value_name = "JSON")]
        row: String,
    },
    /// Remove rows by index
    Remove {
        #[arg(required = true)]
        indexes: Vec<usize>,
    },
    /// Set the checked rows
    Check { indexes: Vec<usize> },
    /// Select a row by key, or clear the selection when omitted
    Select { key: Option<String> },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pgs", "show", "--route", "/a", "-vv"]).unwrap();
        assert_eq!(cli.route, "/a");
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Show { json: false }));
    }

    #[test]
    fn default_route() {
        let cli = Cli::try_parse_from(["pgs", "new"]).unwrap();
        assert_eq!(cli.route, DEFAULT_ROUTE);
    }

    #[test]
    fn layout_widths_split_on_commas() {
        let cli = Cli::try_parse_from(["pgs", "layout", "--col-widths", "100,80"]).unwrap();
        match cli.command {
            Command::Layout { col_widths, .. } => assert_eq!(col_widths, Some(vec![100, 80])),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn set_json_conflicts_with_assignments() {
        assert!(Cli::try_parse_from(["pgs", "set", "a=1", "--json", "{}"]).is_err());
    }
}
