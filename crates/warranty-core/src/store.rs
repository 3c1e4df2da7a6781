//! Storage traits.
//!
//! Implemented by storage backends (e.g. `warranty-store-fs`). The HTTP layer
//! depends on these abstractions, not on any concrete backend.

use std::future::Future;

use bytes::Bytes;

use crate::{
  receipt::StoredReceipt,
  warranty::{NewWarranty, WarrantyRecord},
};

/// Abstraction over the persisted warranty collection.
///
/// Records are append-only. Implementations must serialise concurrent
/// `append` calls so that none of them is lost.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait WarrantyStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All records in insertion order; empty if none exist.
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<WarrantyRecord>, Self::Error>> + Send + '_;

  /// Persist a new record and return it with its assigned id.
  fn append(
    &self,
    input: NewWarranty,
  ) -> impl Future<Output = Result<WarrantyRecord, Self::Error>> + Send + '_;
}

/// Abstraction over the place uploaded receipts are kept.
pub trait ReceiptStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Store `bytes` under a freshly generated name derived from
  /// `original_name`. Never overwrites an existing receipt.
  fn save<'a>(
    &'a self,
    original_name: &'a str,
    bytes: Bytes,
  ) -> impl Future<Output = Result<StoredReceipt, Self::Error>> + Send + 'a;

  /// Delete a previously stored receipt. Used to roll back an upload whose
  /// record could not be appended.
  fn remove<'a>(
    &'a self,
    file_name: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
