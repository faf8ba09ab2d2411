//! Configuration file handling.
//!
//! `dynfilter.yaml` supplies the default accountability and parse context used
//! by `dynfilter resolve`. Command-line flags override it.

use std::path::{Path, PathBuf};

use dynfilter::{Accountability, ParseContext};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{Error, Result};

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "dynfilter.yaml";

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DynfilterConfig {
    /// Accountability used when no `--user` / `--role` flag is given
    #[serde(default)]
    pub accountability: Accountability,

    /// Inline parse context (`$CURRENT_USER`, `$CURRENT_ROLE` records)
    #[serde(default)]
    pub context: ParseContext,

    /// Optional JSON file merged over `context`, relative to the config file
    #[serde(rename = "context-file", default)]
    pub context_file: Option<PathBuf>,

    /// Output settings
    #[serde(default)]
    pub output: OutputSettings,
}

/// Output section of the configuration file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputSettings {
    /// Pretty-print resolved filters
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

/// A configuration together with the directory relative paths resolve against.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    /// The parsed configuration
    pub config: DynfilterConfig,
    /// Directory containing the configuration file
    pub base_dir: PathBuf,
}

impl DynfilterConfig {
    /// Load configuration from a file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            Error::Config(format!("cannot read '{}': {}", path.display(), e))
        })?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save configuration to a file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {}", e)))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load the configuration named by `explicit`, or `dynfilter.yaml` in `dir`.
    ///
    /// An explicit path must exist. Without one, a missing file yields the
    /// default configuration.
    pub async fn discover(explicit: Option<&Path>, dir: &Path) -> Result<LoadedConfig> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = dir.join(CONFIG_FILE_NAME);
                if !fs::try_exists(&candidate).await? {
                    tracing::debug!(dir = %dir.display(), "No config file found, using defaults");
                    return Ok(LoadedConfig {
                        config: Self::default(),
                        base_dir: dir.to_path_buf(),
                    });
                }
                candidate
            }
        };

        tracing::debug!(path = %path.display(), "Loading config");
        let config = Self::load(&path).await?;
        let base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| dir.to_path_buf(), Path::to_path_buf);

        Ok(LoadedConfig { config, base_dir })
    }
}

impl LoadedConfig {
    /// The inline context with `context-file` merged over it.
    pub async fn parse_context(&self) -> Result<ParseContext> {
        let mut context = self.config.context.clone();
        if let Some(file) = &self.config.context_file {
            let path = self.base_dir.join(file);
            context.extend(read_context_file(&path).await?);
        }
        Ok(context)
    }
}

/// Read a JSON object file as a parse context.
pub async fn read_context_file(path: &Path) -> Result<ParseContext> {
    let content = fs::read_to_string(path).await.map_err(|e| {
        Error::Input(format!("cannot read context file '{}': {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Input(format!(
            "context file '{}' must contain a JSON object: {}",
            path.display(),
            e
        ))
    })
}
