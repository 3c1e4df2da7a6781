//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::{
    multipart::{MultipartError, MultipartRejection},
    rejection::JsonRejection,
  },
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Every variant renders as `{"message": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The submitted fields failed validation.
  #[error(transparent)]
  Invalid(#[from] warranty_core::Error),

  /// The request body could not be read as a form.
  #[error("{message}")]
  Rejected { status: StatusCode, message: String },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("receipt error: {0}")]
  Receipt(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<MultipartError> for ApiError {
  fn from(e: MultipartError) -> Self {
    ApiError::Rejected {
      status:  e.status(),
      message: e.body_text(),
    }
  }
}

impl From<MultipartRejection> for ApiError {
  fn from(e: MultipartRejection) -> Self {
    ApiError::Rejected {
      status:  e.status(),
      message: e.body_text(),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(e: JsonRejection) -> Self {
    ApiError::Rejected {
      status:  e.status(),
      message: e.body_text(),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
      ApiError::Rejected { status, .. } => *status,
      ApiError::Store(_) | ApiError::Receipt(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    (status, Json(json!({ "message": self.to_string() }))).into_response()
  }
}
