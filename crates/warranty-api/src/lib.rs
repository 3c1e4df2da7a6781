//! JSON REST API for the warranty tracker.
//!
//! Exposes an axum [`Router`] backed by any
//! [`warranty_core::store::WarrantyStore`] and
//! [`warranty_core::store::ReceiptStore`]. Static file serving, CORS, body
//! limits and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", warranty_api::api_router(store.clone(), receipts.clone()))
//! ```

pub mod error;
pub mod warranties;

use std::sync::Arc;

use axum::{Router, routing::get};
use warranty_core::store::{ReceiptStore, WarrantyStore};

pub use error::ApiError;

/// Shared state threaded through the API handlers.
pub struct AppState<S, R> {
  pub store:    Arc<S>,
  pub receipts: Arc<R>,
}

impl<S, R> Clone for AppState<S, R> {
  fn clone(&self) -> Self {
    Self {
      store:    self.store.clone(),
      receipts: self.receipts.clone(),
    }
  }
}

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, R>(store: Arc<S>, receipts: Arc<R>) -> Router<()>
where
  S: WarrantyStore + 'static,
  R: ReceiptStore + 'static,
{
  Router::new()
    .route(
      "/warranties",
      get(warranties::list::<S, R>).post(warranties::create::<S, R>),
    )
    .with_state(AppState { store, receipts })
}
