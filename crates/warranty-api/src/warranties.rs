//! Handlers for `/warranties` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/warranties` | All records in insertion order |
//! | `POST` | `/warranties` | multipart form (optional `receipt` file) or JSON; returns 201 + stored record |

use axum::{
  Json,
  extract::{FromRequest, Multipart, Request, State},
  http::{HeaderMap, StatusCode, header},
  response::IntoResponse,
};
use bytes::Bytes;
use warranty_core::{
  receipt::{RECEIPT_FIELD, StoredReceipt},
  store::{ReceiptStore, WarrantyStore},
  warranty::{WarrantyFields, WarrantyRecord},
};

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /warranties`
pub async fn list<S, R>(
  State(state): State<AppState<S, R>>,
) -> Result<Json<Vec<WarrantyRecord>>, ApiError>
where
  S: WarrantyStore + 'static,
  R: ReceiptStore + 'static,
{
  let records = state
    .store
    .list()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(records))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// A receipt file read from the request, not yet stored.
#[derive(Debug)]
struct Upload {
  original_name: String,
  bytes:         Bytes,
}

/// The parsed body of a create request.
#[derive(Debug, Default)]
struct CreateForm {
  fields:  WarrantyFields,
  receipt: Option<Upload>,
}

/// `POST /warranties`: returns 201 + the stored [`WarrantyRecord`].
///
/// Accepts `multipart/form-data` (text fields plus an optional `receipt`
/// file) or a JSON body without a receipt. Any other body is treated as
/// carrying no fields.
///
/// Fields are validated before the receipt touches the disk. If the record
/// cannot be appended, the freshly stored receipt is removed again.
pub async fn create<S, R>(
  State(state): State<AppState<S, R>>,
  request: Request,
) -> Result<impl IntoResponse, ApiError>
where
  S: WarrantyStore + 'static,
  R: ReceiptStore + 'static,
{
  let form = match BodyKind::of(request.headers()) {
    BodyKind::Multipart => {
      let multipart = Multipart::from_request(request, &state).await?;
      read_multipart(multipart).await?
    }
    BodyKind::Json => {
      let Json(fields) = Json::<WarrantyFields>::from_request(request, &state).await?;
      CreateForm {
        fields,
        receipt: None,
      }
    }
    BodyKind::Other => CreateForm::default(),
  };

  let mut input = form.fields.into_new()?;

  let stored = match form.receipt {
    Some(upload) => {
      let stored = state
        .receipts
        .save(&upload.original_name, upload.bytes)
        .await
        .map_err(|e| ApiError::Receipt(Box::new(e)))?;
      tracing::debug!(file = %stored.file_name, "stored receipt");
      input.receipt_photo = Some(stored.public_path.clone());
      Some(stored)
    }
    None => None,
  };

  match state.store.append(input).await {
    Ok(record) => {
      tracing::info!(id = record.id, item = %record.item_name, "recorded warranty");
      Ok((StatusCode::CREATED, Json(record)))
    }
    Err(e) => {
      if let Some(stored) = stored {
        discard_receipt(&*state.receipts, &stored).await;
      }
      Err(ApiError::Store(Box::new(e)))
    }
  }
}

/// Roll back a receipt whose record was never appended.
async fn discard_receipt<R: ReceiptStore>(receipts: &R, stored: &StoredReceipt) {
  if let Err(e) = receipts.remove(&stored.file_name).await {
    tracing::warn!(
      file = %stored.file_name,
      error = %e,
      "failed to remove orphaned receipt"
    );
  }
}

async fn read_multipart(mut multipart: Multipart) -> Result<CreateForm, ApiError> {
  let mut form = CreateForm::default();

  while let Some(field) = multipart.next_field().await? {
    let Some(name) = field.name().map(str::to_owned) else {
      continue;
    };

    // Browsers send an empty, unnamed file part when no file was chosen.
    let file_name = field.file_name().filter(|n| !n.is_empty()).map(str::to_owned);

    match (name.as_str(), file_name) {
      (RECEIPT_FIELD, Some(original_name)) => {
        let bytes = field.bytes().await?;
        form.receipt = Some(Upload {
          original_name,
          bytes,
        });
      }
      (_, Some(_)) => {}
      (_, None) => {
        let value = field.text().await?;
        form.fields.set(&name, value);
      }
    }
  }

  Ok(form)
}

// ─── Content negotiation ──────────────────────────────────────────────────────

enum BodyKind {
  Multipart,
  Json,
  Other,
}

impl BodyKind {
  fn of(headers: &HeaderMap) -> Self {
    let Some(content_type) = headers
      .get(header::CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
    else {
      return BodyKind::Other;
    };
    let essence = content_type
      .split(';')
      .next()
      .unwrap_or_default()
      .trim()
      .to_ascii_lowercase();

    if essence == "multipart/form-data" {
      BodyKind::Multipart
    } else if essence == "application/json" || essence.ends_with("+json") {
      BodyKind::Json
    } else {
      BodyKind::Other
    }
  }
}
