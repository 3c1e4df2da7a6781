//! [`ReceiptDir`]: receipts stored as files in one directory.

use std::{
  io::ErrorKind,
  path::{Path, PathBuf},
};

use bytes::Bytes;
use tokio::{fs, io::AsyncWriteExt as _};
use warranty_core::{
  receipt::{self, StoredReceipt},
  store::ReceiptStore,
};

use crate::{Error, Result};

/// How many fresh names to try before giving up on a save.
const MAX_NAME_ATTEMPTS: usize = 8;

/// Receipts kept as plain files under `root`.
#[derive(Debug, Clone)]
pub struct ReceiptDir {
  root: PathBuf,
}

impl ReceiptDir {
  /// Use `root` as the uploads directory. The directory must already exist.
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

  /// Use `root` as the uploads directory, creating it if it is missing.
  pub async fn create(root: impl Into<PathBuf>) -> Result<Self> {
    let root = root.into();
    fs::create_dir_all(&root).await?;
    Ok(Self { root })
  }

  pub fn root(&self) -> &Path { &self.root }

  /// On-disk location of a stored receipt.
  pub fn path_of(&self, file_name: &str) -> Result<PathBuf> {
    if file_name.is_empty()
      || file_name == "."
      || file_name == ".."
      || file_name.contains(['/', '\\'])
    {
      return Err(Error::InvalidFileName(file_name.to_owned()));
    }
    Ok(self.root.join(file_name))
  }
}

impl ReceiptStore for ReceiptDir {
  type Error = Error;

  async fn save(&self, original_name: &str, bytes: Bytes) -> Result<StoredReceipt> {
    for _ in 0..MAX_NAME_ATTEMPTS {
      let file_name = receipt::generate_file_name(original_name);
      let path = self.path_of(&file_name)?;

      let mut file = match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
      {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
        Err(e) => return Err(e.into()),
      };

      let written = async {
        file.write_all(&bytes).await?;
        file.sync_all().await
      }
      .await;

      if let Err(e) = written {
        let _ = fs::remove_file(&path).await;
        return Err(e.into());
      }
      return Ok(StoredReceipt::new(file_name));
    }

    Err(Error::NamesExhausted(MAX_NAME_ATTEMPTS))
  }

  async fn remove(&self, file_name: &str) -> Result<()> {
    fs::remove_file(self.path_of(file_name)?).await?;
    Ok(())
  }
}
