//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `resolve`: Resolve dynamic variables in a filter and print the result
//! - `inspect`: Show how each filter key is classified
//! - `init`: Write a default `dynfilter.yaml`
//!
//! # Global Flags
//!
//! - `--config <PATH>`: Use this config file instead of `./dynfilter.yaml`
//! - `--json`: Machine-readable output
//!
//! # Example
//!
//! ```bash
//! dynfilter resolve --filter '{"owner": {"_eq": "$CURRENT_USER"}}' --user u1
//! dynfilter resolve filter.json --context user.json --now 2024-03-10T12:00:00Z
//! cat filter.json | dynfilter inspect
//! ```

mod args;
mod execute;
mod validators;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use args::{FilterInput, InitArgs, InspectArgs, ResolveArgs};
pub use validators::{validate_identifier, validate_now};

/// Dynfilter - resolve dynamic variables in JSON filters
///
/// Replaces `$NOW`, `$CURRENT_USER` and `$CURRENT_ROLE` tokens in a filter
/// tree with concrete values.
#[derive(Parser, Debug)]
#[command(name = "dynfilter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: ./dynfilter.yaml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve dynamic variables in a filter
    ///
    /// Reads a filter from a file, `--filter`, or stdin and prints the
    /// resolved filter as JSON. A `null` document prints `null`.
    Resolve(ResolveArgs),

    /// Show how each key of a filter is classified
    ///
    /// Lists logical groups, operators, fields and the dynamic variables
    /// the resolver would substitute.
    Inspect(InspectArgs),

    /// Write a default dynfilter.yaml in the current directory
    Init(InitArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        use crate::config::DynfilterConfig;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        match &self.command {
            Some(Commands::Resolve(args)) => {
                let loaded =
                    DynfilterConfig::discover(self.config.as_deref(), &std::env::current_dir()?)
                        .await?;
                execute::execute_resolve(&loaded, args, output_mode).await
            }
            Some(Commands::Inspect(args)) => execute::execute_inspect(args, output_mode).await,
            Some(Commands::Init(args)) => execute::execute_init(args).await,
            None => {
                println!("Dynfilter - dynamic variable resolution for JSON filters");
                println!("Use --help for more information");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_parse_no_command() {
        let cli = Cli::try_parse_from(["dynfilter"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_resolve_with_inline_filter() {
        let cli = Cli::try_parse_from([
            "dynfilter",
            "resolve",
            "--filter",
            r#"{"a": {"_eq": "$CURRENT_USER"}}"#,
            "--user",
            "u1",
            "--role",
            "editor",
            "--now",
            "2024-03-10T12:00:00Z",
            "--compact",
        ])
        .unwrap();

        let Some(Commands::Resolve(args)) = cli.command else {
            panic!("expected resolve command");
        };
        assert!(args.source.input.is_none());
        assert_eq!(args.source.filter.as_deref(), Some(r#"{"a": {"_eq": "$CURRENT_USER"}}"#));
        assert_eq!(args.user.as_deref(), Some("u1"));
        assert_eq!(args.role.as_deref(), Some("editor"));
        assert_eq!(args.now, Some(Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()));
        assert!(args.compact);
    }

    #[test]
    fn test_parse_resolve_with_file_and_context() {
        let cli = Cli::try_parse_from([
            "dynfilter",
            "resolve",
            "filter.json",
            "--context",
            "ctx.json",
            "--config",
            "custom.yaml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        let Some(Commands::Resolve(args)) = cli.command else {
            panic!("expected resolve command");
        };
        assert_eq!(args.source.input, Some(PathBuf::from("filter.json")));
        assert_eq!(args.context, Some(PathBuf::from("ctx.json")));
        assert!(args.now.is_none());
    }

    #[test]
    fn test_parse_rejects_file_and_inline_filter() {
        let result = Cli::try_parse_from(["dynfilter", "resolve", "f.json", "--filter", "{}"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_invalid_now() {
        let result = Cli::try_parse_from(["dynfilter", "resolve", "--now", "yesterday"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_empty_user() {
        let result = Cli::try_parse_from(["dynfilter", "resolve", "--user", " "]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_inspect_json() {
        let cli = Cli::try_parse_from(["dynfilter", "inspect", "-", "--json"]).unwrap();
        assert!(cli.json);
        let Some(Commands::Inspect(args)) = cli.command else {
            panic!("expected inspect command");
        };
        assert_eq!(args.source.input, Some(PathBuf::from("-")));
    }

    #[test]
    fn test_parse_init_flags() {
        let cli = Cli::try_parse_from(["dynfilter", "init", "--force", "--quiet"]).unwrap();
        let Some(Commands::Init(args)) = cli.command else {
            panic!("expected init command");
        };
        assert!(args.force);
        assert!(args.quiet);
    }
}
