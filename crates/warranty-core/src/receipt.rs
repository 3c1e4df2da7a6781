//! Receipt naming.
//!
//! Uploaded receipts are stored under a generated name of the form
//! `receipt-<unix-millis>-<nonce>.<ext>` and served from [`UPLOADS_MOUNT`].
//! The nonce is drawn from the OS RNG in `[0, 1e9)`, so names are unique in
//! practice; storage backends still refuse to overwrite an existing file.

use chrono::Utc;
use rand_core::{OsRng, RngCore as _};

/// Multipart field name carrying the receipt image.
pub const RECEIPT_FIELD: &str = "receipt";

/// URL prefix under which stored receipts are served.
pub const UPLOADS_MOUNT: &str = "/uploads";

const NONCE_BOUND: u32 = 1_000_000_000;
const MAX_EXTENSION_LEN: usize = 16;

/// A receipt that has been written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReceipt {
  /// Generated file name, relative to the uploads directory.
  pub file_name:   String,
  /// Public path, e.g. `/uploads/receipt-1700000000000-42.jpg`.
  pub public_path: String,
}

impl StoredReceipt {
  pub fn new(file_name: String) -> Self {
    let public_path = public_path(&file_name);
    Self {
      file_name,
      public_path,
    }
  }
}

/// Public path for a stored file name.
pub fn public_path(file_name: &str) -> String {
  format!("{UPLOADS_MOUNT}/{file_name}")
}

/// The lower-cased extension of `original`, if it has a usable one.
///
/// Only the text after the last `.` is considered, and it must be 1 to 16
/// ASCII alphanumerics. Anything else yields `None`, so a name like `scan`
/// or `notes.tar gz` produces a file without extension.
pub fn extension_of(original: &str) -> Option<String> {
  let (_, ext) = original.rsplit_once('.')?;
  if ext.is_empty()
    || ext.len() > MAX_EXTENSION_LEN
    || !ext.bytes().all(|b| b.is_ascii_alphanumeric())
  {
    return None;
  }
  Some(ext.to_ascii_lowercase())
}

/// Build a receipt file name from explicit parts.
pub fn file_name(timestamp_ms: i64, nonce: u32, original: &str) -> String {
  let stem = format!("{RECEIPT_FIELD}-{timestamp_ms}-{nonce}");
  match extension_of(original) {
    Some(ext) => format!("{stem}.{ext}"),
    None => stem,
  }
}

/// Generate a fresh receipt file name for an upload called `original`.
pub fn generate_file_name(original: &str) -> String {
  let nonce = OsRng.next_u32() % NONCE_BOUND;
  file_name(Utc::now().timestamp_millis(), nonce, original)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extension_is_taken_after_last_dot() {
    assert_eq!(extension_of("photo.jpg").as_deref(), Some("jpg"));
    assert_eq!(extension_of("scan.final.PNG").as_deref(), Some("png"));
  }

  #[test]
  fn unusable_extensions_are_dropped() {
    assert_eq!(extension_of("scan"), None);
    assert_eq!(extension_of("trailing."), None);
    assert_eq!(extension_of("a.tar gz"), None);
    assert_eq!(extension_of("x.../../etc"), None);
    assert_eq!(extension_of("y.abcdefghijklmnopq"), None);
  }

  #[test]
  fn file_name_layout() {
    assert_eq!(
      file_name(1_700_000_000_000, 42, "photo.jpg"),
      "receipt-1700000000000-42.jpg"
    );
    assert_eq!(file_name(5, 7, "no-extension"), "receipt-5-7");
  }

  #[test]
  fn generated_names_have_expected_shape() {
    let name = generate_file_name("photo.jpg");
    let rest = name.strip_prefix("receipt-").unwrap();
    let rest = rest.strip_suffix(".jpg").unwrap();
    let (ts, nonce) = rest.split_once('-').unwrap();
    assert!(ts.parse::<i64>().unwrap() > 0);
    assert!(nonce.parse::<u32>().unwrap() < NONCE_BOUND);
  }

  #[test]
  fn stored_receipt_public_path() {
    let r = StoredReceipt::new("receipt-1-2.png".into());
    assert_eq!(r.public_path, "/uploads/receipt-1-2.png");
  }
}
