//! Server configuration.
//!
//! Sources, later wins: built-in defaults, an optional TOML file,
//! `WARRANTY_*` environment variables, and finally `PORT`.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  /// The JSON document holding all records.
  pub store_path:       PathBuf,
  /// Directory receipts are written to and served from.
  pub uploads_dir:      PathBuf,
  /// Request body limit for the API, in bytes.
  pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "0.0.0.0".to_string(),
      port:             3001,
      store_path:       PathBuf::from("db.json"),
      uploads_dir:      PathBuf::from("uploads"),
      max_upload_bytes: 10 * 1024 * 1024,
    }
  }
}

impl ServerConfig {
  /// Load configuration from `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::load_with_port(path, std::env::var("PORT").ok())
  }

  /// Like [`ServerConfig::load`], with the `PORT` override passed in.
  /// An empty `PORT` is ignored.
  pub fn load_with_port(
    path: &Path,
    port: Option<String>,
  ) -> Result<Self, ConfigError> {
    Self::load_from(path, Environment::with_prefix("WARRANTY"), port)
  }

  fn load_from(
    path: &Path,
    env: Environment,
    port: Option<String>,
  ) -> Result<Self, ConfigError> {
    Config::builder()
      .add_source(File::from(path).required(false))
      .add_source(env)
      .set_override_option("port", port.filter(|p| !p.is_empty()))?
      .build()?
      .try_deserialize()
  }

  /// Bind address, `host:port`.
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
