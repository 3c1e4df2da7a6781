//! [`JsonStore`], the JSON-document implementation of [`WarrantyStore`].

use std::{
  io::ErrorKind,
  path::{Path, PathBuf},
  sync::Arc,
};

use chrono::Utc;
use tokio::{fs, sync::Mutex};
use warranty_core::{
  store::WarrantyStore,
  warranty::{NewWarranty, WarrantyRecord, next_id},
};

use crate::{
  Error, Result,
  document::{self, Document},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A warranty store backed by a single JSON file.
///
/// Every call reloads the file; every append rewrites it in full. Appends are
/// serialised through an internal mutex, so concurrent appends on clones of
/// the same store never lose records. Separate `JsonStore`s opened on the same
/// path do not share that mutex.
///
/// Cloning is cheap; the inner state is reference-counted.
#[derive(Clone)]
pub struct JsonStore {
  inner: Arc<Inner>,
}

struct Inner {
  path:       PathBuf,
  write_lock: Mutex<()>,
}

impl JsonStore {
  /// Open the store at `path`, creating an empty document (and any missing
  /// parent directories) if the file does not exist.
  ///
  /// An existing file is parsed once up front so a malformed document is
  /// reported at startup rather than on the first request.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();

    match fs::metadata(&path).await {
      Ok(_) => {
        document::load(&path).await?;
      }
      Err(e) if e.kind() == ErrorKind::NotFound => {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
        {
          fs::create_dir_all(parent).await?;
        }
        document::save(&path, &Document::default()).await?;
      }
      Err(e) => return Err(e.into()),
    }

    Ok(Self {
      inner: Arc::new(Inner {
        path,
        write_lock: Mutex::new(()),
      }),
    })
  }

  /// Path of the backing document.
  pub fn path(&self) -> &Path { &self.inner.path }

  /// Load the full document, including the `users` collection.
  pub async fn document(&self) -> Result<Document> {
    document::load(&self.inner.path).await
  }
}

// ─── WarrantyStore impl ──────────────────────────────────────────────────────

impl WarrantyStore for JsonStore {
  type Error = crate::Error;

  async fn list(&self) -> Result<Vec<WarrantyRecord>> {
    Ok(self.document().await?.warranties)
  }

  async fn append(&self, input: NewWarranty) -> Result<WarrantyRecord> {
    let _guard = self.inner.write_lock.lock().await;

    let mut doc = self.document().await?;
    let last = doc.warranties.iter().map(|w| w.id).max();
    let id = next_id(Utc::now().timestamp_millis(), last)
      .ok_or(Error::IdsExhausted)?;
    let record = input.into_record(id);

    doc.warranties.push(record.clone());
    document::save(&self.inner.path, &doc).await?;

    Ok(record)
  }
}
