//! Output formatting for CLI commands.
//!
//! Resolved filters are always printed as JSON. The `inspect` command also has
//! a text rendering: a key tree with ASCII/Unicode connectors where operator
//! keys are cyan and dynamic variables yellow.

use std::env;
use std::io::{self, Write};

use colored::Colorize;
use serde::Serialize;

use crate::inspect::{InspectNode, InspectReport};

/// Output mode for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic use
    Json,
}

/// Configuration for text output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use ASCII-only connectors instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create an OutputConfig with explicit values.
    pub fn new(use_ascii: bool, use_colors: bool) -> Self {
        Self {
            use_ascii,
            use_colors,
        }
    }

    /// Create an OutputConfig by reading from environment variables.
    ///
    /// Reads:
    /// - `DYNFILTER_ASCII`: Set to "1" or "true" for ASCII-only connectors (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `DYNFILTER_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        let use_ascii = match env::var("DYNFILTER_ASCII") {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Ok(v) => {
                tracing::warn!(
                    env_var = "DYNFILTER_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            Err(_) => false,
        };

        // Respect NO_COLOR standard (https://no-color.org/)
        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("DYNFILTER_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(false, true)
    }
}

/// Serialize `value` as JSON, optionally pretty-printed.
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> io::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).map_err(io::Error::other)
    } else {
        serde_json::to_string(value).map_err(io::Error::other)
    }
}

/// Print `value` as JSON to stdout.
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", to_json(value, pretty)?)
}

/// Print an inspection report to stdout.
pub fn print_inspect_report(report: &InspectReport, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(report, true),
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_inspect_report(&mut handle, report, &OutputConfig::from_env())
        }
    }
}

/// Render the report as a key tree followed by a variable summary.
///
/// ```text
/// filter
/// └── _or (logical)
///     ├── [0] (group member)
///     │   └── owner (field)
///     │       └── _eq (operator) = "$CURRENT_USER"
///     └── [1] (group member)
///
/// Dynamic variables: $CURRENT_USER
/// ```
pub fn write_inspect_report<W: Write>(
    w: &mut W,
    report: &InspectReport,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "{}", paint("filter", config, |s| s.bold().to_string()))?;
    write_children(w, &report.keys, "", config)?;
    writeln!(w)?;

    if report.dynamic_variables.is_empty() {
        writeln!(w, "Dynamic variables: none")
    } else {
        let tokens: Vec<String> = report
            .dynamic_variables
            .iter()
            .map(|t| paint(t, config, |s| s.yellow().to_string()))
            .collect();
        writeln!(w, "Dynamic variables: {}", tokens.join(", "))
    }
}

fn write_children<W: Write>(
    w: &mut W,
    nodes: &[InspectNode],
    prefix: &str,
    config: &OutputConfig,
) -> io::Result<()> {
    let (branch, last_branch, pipe) = if config.use_ascii {
        ("|-- ", "`-- ", "|   ")
    } else {
        ("├── ", "└── ", "│   ")
    };

    for (i, node) in nodes.iter().enumerate() {
        let is_last = i + 1 == nodes.len();
        let connector = if is_last { last_branch } else { branch };
        writeln!(
            w,
            "{}{}{}",
            prefix,
            paint(connector, config, |s| s.dimmed().to_string()),
            describe(node, config)
        )?;

        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { pipe });
        write_children(w, &node.children, &child_prefix, config)?;
    }
    Ok(())
}

fn describe(node: &InspectNode, config: &OutputConfig) -> String {
    let key = if node.key.starts_with('_') {
        paint(&node.key, config, |s| s.cyan().to_string())
    } else {
        node.key.clone()
    };
    let kind = paint(&format!("({})", node.kind), config, |s| s.dimmed().to_string());

    match &node.value {
        Some(value) => {
            let rendered = value.to_string();
            let rendered = if node.dynamic.is_empty() {
                rendered
            } else {
                paint(&rendered, config, |s| s.yellow().to_string())
            };
            format!("{key} {kind} = {rendered}")
        }
        None => format!("{key} {kind}"),
    }
}

fn paint(text: &str, config: &OutputConfig, style: impl Fn(&str) -> String) -> String {
    if config.use_colors {
        style(text)
    } else {
        text.to_string()
    }
}
