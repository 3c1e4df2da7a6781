//! Error types for `warranty-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// One of `itemName`, `purchaseDate` or `warrantyExpirationDate` was absent
  /// or blank. The display text is part of the HTTP contract.
  #[error("Missing required fields.")]
  MissingFields,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
