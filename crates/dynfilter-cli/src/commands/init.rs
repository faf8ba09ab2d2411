//! Implementation of the `init` command.
//!
//! Writes a default `dynfilter.yaml` into a directory so that later
//! `dynfilter resolve` runs pick up an accountability and parse context.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::config::{DynfilterConfig, CONFIG_FILE_NAME};
use crate::error::{Error, Result};

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// Path to the written config file
    pub config_file: PathBuf,
    /// Whether an existing file was replaced
    pub overwritten: bool,
}

/// Write a default configuration file into `base_dir`.
///
/// # Errors
///
/// Returns an error if:
/// - `dynfilter.yaml` already exists and `force` is false
/// - File system operations fail
pub async fn init(base_dir: &Path, force: bool) -> Result<InitResult> {
    let config_file = base_dir.join(CONFIG_FILE_NAME);
    let exists = fs::try_exists(&config_file).await?;

    if exists && !force {
        return Err(Error::Config(format!(
            "'{}' already exists. Use --force to overwrite it",
            config_file.display()
        )));
    }

    DynfilterConfig::default().save(&config_file).await?;
    tracing::debug!(path = %config_file.display(), overwritten = exists, "Wrote config");

    Ok(InitResult {
        config_file,
        overwritten: exists,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn init_writes_loadable_default_config() {
        let temp = TempDir::new().unwrap();

        let result = init(temp.path(), false).await.unwrap();

        assert!(!result.overwritten);
        assert_eq!(result.config_file, temp.path().join(CONFIG_FILE_NAME));
        let loaded = DynfilterConfig::load(&result.config_file).await.unwrap();
        assert_eq!(loaded, DynfilterConfig::default());
    }

    #[tokio::test]
    async fn init_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "accountability:\n  user: keep-me\n")
            .await
            .unwrap();

        let err = init(temp.path(), false).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));

        let content = fs::read_to_string(&path).await.unwrap();
        assert!(content.contains("keep-me"));
    }

    #[tokio::test]
    async fn init_with_force_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "accountability:\n  user: old\n").await.unwrap();

        let result = init(temp.path(), true).await.unwrap();

        assert!(result.overwritten);
        let loaded = DynfilterConfig::load(&path).await.unwrap();
        assert_eq!(loaded.accountability.user, None);
    }
}
