//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with microsecond precision.
//! UUIDs are stored as hyphenated lowercase strings. Record bodies are JSON.

use campus_core::{Record, Reference, Resource, user::User};
use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── References ──────────────────────────────────────────────────────────────

/// A [`Reference`] with its id ready to bind as an SQL parameter.
pub struct EncodedReference {
  /// JSON key of the reference inside `body_json`.
  pub field:      &'static str,
  pub collection: &'static str,
  pub id:         String,
}

pub fn encode_references(refs: &[Reference]) -> Vec<EncodedReference> {
  refs
    .iter()
    .map(|r| EncodedReference {
      field:      r.field,
      collection: r.collection.as_str(),
      id:         encode_uuid(r.id),
    })
    .collect()
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `documents` row.
pub struct RawDocument {
  pub id:         String,
  pub owner:      String,
  pub body_json:  String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawDocument {
  /// Column order: `id, owner, body_json, created_at, updated_at`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawDocument {
      id:         row.get(0)?,
      owner:      row.get(1)?,
      body_json:  row.get(2)?,
      created_at: row.get(3)?,
      updated_at: row.get(4)?,
    })
  }

  pub fn into_record<R: Resource>(self) -> Result<Record<R>> {
    Ok(Record {
      id:         decode_uuid(&self.id)?,
      owner:      decode_uuid(&self.owner)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      body:       serde_json::from_str(&self.body_json)?,
    })
  }
}

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub email:      String,
  pub created_at: String,
}

impl RawUser {
  /// Column order: `user_id, email, created_at`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawUser {
      user_id:    row.get(0)?,
      email:      row.get(1)?,
      created_at: row.get(2)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      email:      self.email,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamps_round_trip_at_store_precision() {
    let t = now();
    assert_eq!(decode_dt(&encode_dt(t)).unwrap(), t);
  }

  #[test]
  fn encoded_timestamps_sort_lexically() {
    let a = decode_dt("2024-01-01T00:00:00.5Z").unwrap();
    let b = decode_dt("2024-01-01T00:00:00.25Z").unwrap();
    assert!(encode_dt(b) < encode_dt(a));
  }
}
