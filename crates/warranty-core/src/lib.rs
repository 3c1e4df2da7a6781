//! Core types and trait definitions for the warranty tracker.
//!
//! This crate is deliberately free of HTTP and filesystem dependencies.
//! The storage backend and the API layer both depend on it.

pub mod error;
pub mod receipt;
pub mod store;
pub mod warranty;

pub use error::{Error, Result};
