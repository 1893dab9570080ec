//! The `Resource` trait and the stored `Record` envelope.
//!
//! A resource is the client-editable body of a record. The envelope fields
//! (`_id`, `owner`, `createdAt`, `updatedAt`) are always assigned by the
//! server and are never read from request bodies.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::validate::FieldErrors;

// ─── Collections ─────────────────────────────────────────────────────────────

/// The document collection a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
  Houses,
  Schools,
  Surveys,
  Responses,
}

impl Collection {
  pub fn as_str(self) -> &'static str {
    match self {
      Collection::Houses => "houses",
      Collection::Schools => "schools",
      Collection::Surveys => "surveys",
      Collection::Responses => "responses",
    }
  }
}

impl fmt::Display for Collection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A link from one record to another, checked by the store on every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
  /// Name of the field holding the id, as it appears in JSON.
  pub field:      &'static str,
  pub collection: Collection,
  pub id:         Uuid,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A record body that can be created, listed, patched and deleted.
pub trait Resource:
  Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
  /// Collection the records are stored in.
  const COLLECTION: Collection;

  /// JSON keys that hold the id of another record.
  const REFERENCE_FIELDS: &'static [&'static str] = &[];

  /// Partial update accepted by PATCH. Fields sent as `""` deserialise to
  /// `None` and are left untouched by [`Resource::apply`].
  type Patch: DeserializeOwned + Send + 'static;

  /// Check required fields. Runs before every create and after every merge.
  fn validate(&self) -> Result<(), FieldErrors>;

  /// Merge `patch` into `self`, overwriting only the fields it carries.
  fn apply(&mut self, patch: Self::Patch);

  /// Records this body points at.
  fn references(&self) -> Vec<Reference> { Vec::new() }
}

// ─── Envelope ────────────────────────────────────────────────────────────────

/// A stored resource together with its server-maintained metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<R> {
  #[serde(rename = "_id")]
  pub id:         Uuid,
  /// The creating user. Set once at insert, never changed.
  pub owner:      Uuid,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  #[serde(flatten)]
  pub body:       R,
}
