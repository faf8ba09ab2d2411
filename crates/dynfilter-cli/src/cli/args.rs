//! CLI argument structs for all commands.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser};

use super::validators::{validate_identifier, validate_now};

/// Where to read a filter from.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterInput {
    /// Filter file to read, or `-` for stdin (default: stdin)
    #[arg(value_name = "INPUT", conflicts_with = "filter")]
    pub input: Option<PathBuf>,

    /// Inline filter JSON
    #[arg(short, long, value_name = "JSON")]
    pub filter: Option<String>,
}

/// Arguments for the `resolve` command
#[derive(Parser, Debug, Clone)]
pub struct ResolveArgs {
    /// Filter source
    #[command(flatten)]
    pub source: FilterInput,

    /// Current user identifier (overrides the config file)
    #[arg(short, long, value_parser = validate_identifier)]
    pub user: Option<String>,

    /// Current role identifier (overrides the config file)
    #[arg(short, long, value_parser = validate_identifier)]
    pub role: Option<String>,

    /// JSON file with `$CURRENT_USER` / `$CURRENT_ROLE` records
    ///
    /// Merged over the context from the config file.
    #[arg(short, long, value_name = "FILE")]
    pub context: Option<PathBuf>,

    /// Instant used for `$NOW` (RFC 3339, default: current time)
    #[arg(long, value_parser = validate_now)]
    pub now: Option<DateTime<Utc>>,

    /// Print compact JSON instead of pretty-printed JSON
    #[arg(long)]
    pub compact: bool,
}

/// Arguments for the `inspect` command
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Filter source
    #[command(flatten)]
    pub source: FilterInput,
}

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite an existing dynfilter.yaml
    #[arg(long)]
    pub force: bool,

    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}
