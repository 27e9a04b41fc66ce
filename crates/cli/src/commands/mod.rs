//! CLI commands.
//!
//! Each command talks to Wix through the API-key client and writes its
//! results as pretty JSON under the output directory.

pub mod categories;
pub mod config;
pub mod inventory;
pub mod products;
pub mod search;

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use wix_headless_storefront::config::{ConfigError, WixConfig};
use wix_headless_storefront::wix::{ClientFactory, WixClient, WixError};

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Wix API error: {0}")]
    Wix(#[from] WixError),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
}

/// Shared state for one command run.
pub struct Context {
    pub client: WixClient,
    pub out: PathBuf,
}

impl Context {
    /// Load the YAML config and build the API-key client.
    ///
    /// # Errors
    ///
    /// Returns the config loader's error.
    pub fn load(config_path: &Path, api_base_url: &str, out: PathBuf) -> Result<Self, CliError> {
        let config = WixConfig::load(config_path)?;
        let client = ClientFactory::new(&config, api_base_url).server_client();
        Ok(Self { client, out })
    }
}

/// Write `value` as pretty JSON to `dir/name`, creating directories.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json<T: Serialize + ?Sized>(dir: &Path, name: &str, value: &T) -> Result<PathBuf, CliError> {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| CliError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(&path, json).map_err(|source| CliError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), "Wrote output");
    Ok(path)
}

/// Current time for `fetchedAt` fields.
pub fn fetched_at() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_write_json_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(dir.path(), "nested/value.json", &serde_json::json!({"a": 1})).unwrap();

        assert_eq!(path, dir.path().join("nested/value.json"));
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["a"], 1);
    }

    #[test]
    fn test_write_json_is_pretty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(dir.path(), "v.json", &serde_json::json!({"a": 1})).unwrap();
        assert!(std::fs::read_to_string(path).unwrap().contains('\n'));
    }

    #[test]
    fn test_context_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let result = Context::load(
            &dir.path().join("missing.yaml"),
            "http://127.0.0.1:1",
            dir.path().to_path_buf(),
        );
        assert!(matches!(result, Err(CliError::Config(ConfigError::FileNotFound(_)))));
    }
}
