//! Deserialisation helpers for partial updates.
//!
//! Clients omit a change by sending the field as an empty string rather than
//! leaving the key out. Patch structs mark every field with
//! `#[serde(default, deserialize_with = "non_blank")]` so that `""`, `null`
//! and a missing key all become `None`.

use serde::{Deserialize, Deserializer, de::DeserializeOwned, de::Error as _};
use serde_json::Value;

/// Deserialise an optional patch field, treating `""` and `null` as absent.
///
/// Any other value must parse as `T`; for nested patch objects the same rule
/// applies again to each inner field.
pub fn non_blank<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  match Value::deserialize(de)? {
    Value::Null => Ok(None),
    Value::String(s) if s.is_empty() => Ok(None),
    other => T::deserialize(other).map(Some).map_err(D::Error::custom),
  }
}

/// Overwrite `slot` when the patch carries a value.
pub fn merge<T>(slot: &mut T, value: Option<T>) {
  if let Some(value) = value {
    *slot = value;
  }
}
