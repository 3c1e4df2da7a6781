//! The persisted JSON document and its whole-file read/write.
//!
//! Shape: `{ "users": [...], "warranties": [...] }`. `users` is opaque to the
//! tracker and carried through every rewrite unchanged.

use std::{
  ffi::OsString,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tokio::{fs, io::AsyncWriteExt as _};
use uuid::Uuid;
use warranty_core::warranty::WarrantyRecord;

use crate::{Error, Result};

/// The full store document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
  #[serde(default)]
  pub users:      Vec<serde_json::Value>,
  #[serde(default)]
  pub warranties: Vec<WarrantyRecord>,
}

/// Read and parse the document at `path`.
pub(crate) async fn load(path: &Path) -> Result<Document> {
  let bytes = fs::read(path).await?;
  serde_json::from_slice(&bytes).map_err(|source| Error::Malformed {
    path: path.to_path_buf(),
    source,
  })
}

/// Replace the document at `path`.
///
/// The new content is written and synced to a sibling temporary file which is
/// then renamed over `path`, so readers see either the old or the new
/// document and never a truncated one.
pub(crate) async fn save(path: &Path, doc: &Document) -> Result<()> {
  let data = serde_json::to_vec_pretty(doc)?;
  let tmp = temp_path(path);

  let written = async {
    let mut file = fs::File::create(&tmp).await?;
    file.write_all(&data).await?;
    file.sync_all().await?;
    fs::rename(&tmp, path).await
  }
  .await;

  if let Err(e) = written {
    let _ = fs::remove_file(&tmp).await;
    return Err(e.into());
  }
  Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
  let mut name = OsString::from(path.as_os_str());
  name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
  PathBuf::from(name)
}
