//! Warranty records, the only entity the tracker persists.
//!
//! Records are append-only: once stored, no field is ever updated and no
//! record is ever removed.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Record ──────────────────────────────────────────────────────────────────

/// A stored warranty record. Serialised with camelCase keys, which is both
/// the on-disk and the wire representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarrantyRecord {
  /// Store-assigned; see [`next_id`].
  pub id:                       i64,
  pub item_name:                String,
  /// Caller-supplied; the format is not validated.
  pub purchase_date:            String,
  /// Caller-supplied; the format is not validated.
  pub warranty_expiration_date: String,
  /// Public path of the uploaded receipt (`/uploads/...`), if any.
  pub receipt_photo:            Option<String>,
}

// ─── NewWarranty ─────────────────────────────────────────────────────────────

/// Input to [`crate::store::WarrantyStore::append`].
/// `id` is always assigned by the store; it is not accepted from callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWarranty {
  pub item_name:                String,
  pub purchase_date:            String,
  pub warranty_expiration_date: String,
  pub receipt_photo:            Option<String>,
}

impl NewWarranty {
  /// Attach the store-assigned identifier.
  pub fn into_record(self, id: i64) -> WarrantyRecord {
    WarrantyRecord {
      id,
      item_name: self.item_name,
      purchase_date: self.purchase_date,
      warranty_expiration_date: self.warranty_expiration_date,
      receipt_photo: self.receipt_photo,
    }
  }
}

// ─── Form fields ─────────────────────────────────────────────────────────────

/// The text fields of a create request, collected before validation.
///
/// Deserialises from a JSON body with the same camelCase keys as
/// [`WarrantyRecord`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarrantyFields {
  pub item_name:                Option<String>,
  pub purchase_date:            Option<String>,
  pub warranty_expiration_date: Option<String>,
}

impl WarrantyFields {
  /// Record a form field by its wire name. Returns `false` for names that are
  /// not part of a warranty record; those are ignored by callers.
  pub fn set(&mut self, name: &str, value: String) -> bool {
    let slot = match name {
      "itemName" => &mut self.item_name,
      "purchaseDate" => &mut self.purchase_date,
      "warrantyExpirationDate" => &mut self.warranty_expiration_date,
      _ => return false,
    };
    *slot = Some(value);
    true
  }

  /// Validate and convert into a [`NewWarranty`].
  ///
  /// All three fields must be present and non-blank. Callers run this before
  /// placing a receipt on disk so a rejected request never leaves a file
  /// behind; `receipt_photo` starts out empty and is filled in afterwards.
  pub fn into_new(self) -> Result<NewWarranty> {
    let keep = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    match (
      keep(self.item_name),
      keep(self.purchase_date),
      keep(self.warranty_expiration_date),
    ) {
      (Some(item_name), Some(purchase_date), Some(warranty_expiration_date)) => {
        Ok(NewWarranty {
          item_name,
          purchase_date,
          warranty_expiration_date,
          receipt_photo: None,
        })
      }
      _ => Err(Error::MissingFields),
    }
  }
}

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Choose the id for a new record.
///
/// Ids are creation timestamps in milliseconds, bumped past `last` when two
/// records land in the same millisecond (or the clock goes backwards), so ids
/// stay unique and strictly increasing within a store.
///
/// Returns `None` once `last` is `i64::MAX` and no larger id exists.
pub fn next_id(now_ms: i64, last: Option<i64>) -> Option<i64> {
  match last {
    Some(last) if last >= now_ms => last.checked_add(1),
    _ => Some(now_ms),
  }
}
