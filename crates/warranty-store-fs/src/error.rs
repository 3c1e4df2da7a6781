//! Error type for `warranty-store-fs`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// The persisted document exists but is not a valid store document.
  #[error("malformed store document {path:?}: {source}")]
  Malformed {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// A receipt file name that would escape the uploads directory.
  #[error("invalid receipt file name: {0:?}")]
  InvalidFileName(String),

  /// Every generated receipt name collided with an existing file.
  #[error("could not find a free receipt file name after {0} attempts")]
  NamesExhausted(usize),

  /// The newest record already holds the largest representable id.
  #[error("no record id left after {}", i64::MAX)]
  IdsExhausted,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
