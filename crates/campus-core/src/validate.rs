//! Field-level validation errors collected before a record is written.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use uuid::Uuid;

/// Field name → human-readable problem, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
  pub fn new() -> Self { Self::default() }

  /// A set holding exactly one error.
  pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
    let mut errors = Self::new();
    errors.push(field, message);
    errors
  }

  /// Record a problem with `field`. The first problem reported for a field
  /// wins.
  pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.entry(field.into()).or_insert_with(|| message.into());
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn get(&self, field: &str) -> Option<&str> {
    self.0.get(field).map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  /// `Ok(())` when nothing was recorded, otherwise the collected errors.
  pub fn into_result(self) -> Result<(), FieldErrors> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }
}

impl fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, message) in self.iter() {
      if !first {
        f.write_str("; ")?;
      }
      write!(f, "{field}: {message}")?;
      first = false;
    }
    Ok(())
  }
}

/// Require a non-empty string.
pub fn require_text(errors: &mut FieldErrors, field: &str, value: &str) {
  if value.is_empty() {
    errors.push(field, "is required");
  }
}

/// Require a reference to be set. Unset references deserialise to the nil id.
pub fn require_id(errors: &mut FieldErrors, field: &str, id: Uuid) {
  if id.is_nil() {
    errors.push(field, "is required");
  }
}
