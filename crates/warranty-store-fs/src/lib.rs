//! Filesystem backend for the warranty tracker.
//!
//! Records live in a single JSON document that is reloaded before every read
//! and rewritten in full after every append. Receipts are plain files in an
//! uploads directory.

mod document;
mod receipts;
mod store;

pub mod error;

pub use document::Document;
pub use error::{Error, Result};
pub use receipts::ReceiptDir;
pub use store::JsonStore;
