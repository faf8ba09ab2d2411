//! Command execution logic.

use std::path::Path;

use anyhow::Result;
use dynfilter::{Accountability, Filter, FilterResolver};
use serde_json::Value;
use tokio::fs;
use tokio::io::AsyncReadExt;

use super::args::{FilterInput, InitArgs, InspectArgs, ResolveArgs};
use crate::config::{read_context_file, LoadedConfig};
use crate::error::Error;
use crate::inspect::InspectReport;
use crate::output::{self, OutputMode};

/// Execute the init command
pub async fn execute_init(args: &InitArgs) -> Result<()> {
    use crate::commands::init;

    let current_dir = std::env::current_dir()?;
    let result = init::init(&current_dir, args.force).await?;

    if !args.quiet {
        let verb = if result.overwritten {
            "Overwrote"
        } else {
            "Created"
        };
        println!("{} {}", verb, result.config_file.display());
    }

    Ok(())
}

/// Execute the resolve command
pub async fn execute_resolve(
    loaded: &LoadedConfig,
    args: &ResolveArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let filter = read_filter(&args.source).await?;

    let accountability = merge_accountability(
        &loaded.config.accountability,
        args.user.as_deref(),
        args.role.as_deref(),
    );

    let mut context = loaded.parse_context().await?;
    if let Some(path) = &args.context {
        context.extend(read_context_file(path).await?);
    }

    let mut resolver = FilterResolver::new(Some(&accountability), &context);
    if let Some(now) = args.now {
        resolver = resolver.with_now(now);
    }

    let resolved = resolver.resolve(filter.as_ref()).map_err(Error::from)?;

    // --json forces compact output for piping; otherwise follow the config.
    let pretty = !args.compact && output_mode == OutputMode::Text && loaded.config.output.pretty;
    output::print_json(&resolved, pretty)?;

    Ok(())
}

/// Execute the inspect command
pub async fn execute_inspect(args: &InspectArgs, output_mode: OutputMode) -> Result<()> {
    let Some(filter) = read_filter(&args.source).await? else {
        match output_mode {
            OutputMode::Json => output::print_json(&Value::Null, false)?,
            OutputMode::Text => println!("No filter (null input)"),
        }
        return Ok(());
    };

    let report = InspectReport::new(&filter);
    output::print_inspect_report(&report, output_mode)?;
    Ok(())
}

/// Apply `--user` / `--role` overrides on top of the configured accountability.
pub(crate) fn merge_accountability(
    base: &Accountability,
    user: Option<&str>,
    role: Option<&str>,
) -> Accountability {
    Accountability {
        user: user.map(str::to_string).or_else(|| base.user.clone()),
        role: role.map(str::to_string).or_else(|| base.role.clone()),
    }
}

/// Read the filter from `--filter`, a file, or stdin.
///
/// A JSON `null` document yields `None`.
async fn read_filter(source: &FilterInput) -> Result<Option<Filter>> {
    let text = match (&source.filter, &source.input) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) if path != Path::new("-") => {
            fs::read_to_string(path).await.map_err(|e| {
                Error::Input(format!("cannot read filter file '{}': {}", path.display(), e))
            })?
        }
        _ => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    Ok(parse_filter_document(&text)?)
}

/// Parse filter JSON text, mapping a `null` document to `None`.
pub(crate) fn parse_filter_document(text: &str) -> crate::error::Result<Option<Filter>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| Error::Input(format!("filter is not valid JSON: {}", e)))?;

    match value {
        Value::Null => Ok(None),
        other => Ok(Some(Filter::from_value(other)?)),
    }
}
