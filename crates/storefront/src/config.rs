//! Storefront configuration.
//!
//! Wix credentials come from a YAML file; everything else from environment
//! variables.
//!
//! # YAML (`wix-config.yaml`)
//!
//! ```yaml
//! apiKeyStrategy:
//!   apiKey: "IST.xxxx"
//!   siteId: "6f0c..."
//! oauthStrategy:
//!   clientId: "a1b2..."
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `WIX_CONFIG_PATH` - Path of the YAML file (default: wix-config.yaml)
//! - `WIX_CLIENT_ID` - OAuth client ID for visitor tokens (overrides the YAML)
//! - `WIX_API_BASE_URL` - Wix API host (default: <https://www.wixapis.com>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::wix::{ApiKeyCredentials, DEFAULT_API_BASE_URL};

/// Default location of the YAML credentials file.
pub const DEFAULT_WIX_CONFIG_PATH: &str = "wix-config.yaml";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Config file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid YAML in config file: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
    #[error("Missing `{0}` section in config file")]
    MissingSection(&'static str),
    #[error("Missing `{0}` in config file")]
    MissingField(&'static str),
    #[error("`{0}` in config file is empty")]
    EmptyField(&'static str),
    #[error("`{field}` in config file must be a {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("No OAuth client id: set `oauthStrategy.clientId` or WIX_CLIENT_ID")]
    MissingClientId,
}

/// Wix credentials loaded from YAML.
#[derive(Debug, Clone)]
pub struct WixConfig {
    /// Server-side API key strategy
    pub api_key: ApiKeyCredentials,
    /// OAuth client ID for visitor tokens
    pub client_id: Option<String>,
}

impl WixConfig {
    /// Load credentials from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a distinct `ConfigError` for a missing file, unreadable or
    /// invalid YAML, a missing `apiKeyStrategy` section, and a missing,
    /// empty or non-string `apiKey` or `siteId`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parse credentials from YAML text.
    ///
    /// # Errors
    ///
    /// See [`WixConfig::load`].
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let root: Value = serde_yaml::from_str(contents)?;
        let root = match root {
            Value::Mapping(map) => map,
            Value::Null => return Err(ConfigError::MissingSection("apiKeyStrategy")),
            _ => {
                return Err(ConfigError::InvalidType {
                    field: "(root)",
                    expected: "mapping",
                });
            }
        };

        let strategy = section(&root, "apiKeyStrategy")?
            .ok_or(ConfigError::MissingSection("apiKeyStrategy"))?;
        let api_key = required_string(strategy, "apiKey", "apiKeyStrategy.apiKey")?;
        let site_id = required_string(strategy, "siteId", "apiKeyStrategy.siteId")?;

        let client_id = match section(&root, "oauthStrategy")? {
            Some(oauth) => optional_string(oauth, "clientId", "oauthStrategy.clientId")?,
            None => None,
        };

        Ok(Self {
            api_key: ApiKeyCredentials {
                api_key: SecretString::from(api_key),
                site_id,
            },
            client_id,
        })
    }
}

fn section<'a>(root: &'a Mapping, key: &'static str) -> Result<Option<&'a Mapping>, ConfigError> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Mapping(map)) => Ok(Some(map)),
        Some(_) => Err(ConfigError::InvalidType {
            field: key,
            expected: "mapping",
        }),
    }
}

fn optional_string(
    map: &Mapping,
    key: &str,
    field: &'static str,
) -> Result<Option<String>, ConfigError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(_) => Err(ConfigError::InvalidType {
            field,
            expected: "string",
        }),
    }
}

fn required_string(map: &Mapping, key: &str, field: &'static str) -> Result<String, ConfigError> {
    match map.get(key) {
        None | Some(Value::Null) => Err(ConfigError::MissingField(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ConfigError::EmptyField(field)),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(ConfigError::InvalidType {
            field,
            expected: "string",
        }),
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Wix API host
    pub api_base_url: String,
    /// Wix credentials; `client_id` is always set
    pub wix: WixConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables and the YAML file.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// the YAML file fails to load, or no OAuth client id is configured.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        let api_base_url = get_env_or_default("WIX_API_BASE_URL", DEFAULT_API_BASE_URL);

        let config_path = get_env_or_default("WIX_CONFIG_PATH", DEFAULT_WIX_CONFIG_PATH);
        let mut wix = WixConfig::load(&config_path)?;
        if let Some(client_id) = get_optional_env("WIX_CLIENT_ID") {
            wix.client_id = Some(client_id);
        }
        if wix.client_id.is_none() {
            return Err(ConfigError::MissingClientId);
        }

        Ok(Self {
            host,
            port,
            base_url,
            api_base_url,
            wix,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional, non-empty environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
