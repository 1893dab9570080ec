//! [`SqliteStore`]: the SQLite implementation of [`RecordStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use campus_core::{
  Collection, Record, Reference, Resource,
  store::RecordStore,
  user::User,
};

use crate::{
  Error, Result,
  encode::{
    EncodedReference, RawDocument, RawUser, encode_dt, encode_references,
    encode_uuid, now,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Campus record store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// What a guarded write found once it reached the connection thread.
enum WriteOutcome {
  Written,
  /// Index into the reference list of the first id that does not exist.
  MissingReference(usize),
  /// The target row was deleted between the read and the write.
  Vanished,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Return the index of the first reference with no matching row.
fn first_missing<'a>(
  conn: &rusqlite::Connection,
  refs: impl IntoIterator<Item = (usize, &'a EncodedReference)>,
) -> rusqlite::Result<Option<usize>> {
  for (i, r) in refs {
    let exists = conn
      .query_row(
        "SELECT 1 FROM documents WHERE id = ?1 AND collection = ?2",
        rusqlite::params![r.id, r.collection],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false);
    if !exists {
      return Ok(Some(i));
    }
  }
  Ok(None)
}

/// The id currently stored under `field` on row `id`, if any.
fn stored_reference(
  conn: &rusqlite::Connection,
  id: &str,
  collection: &str,
  field: &str,
) -> rusqlite::Result<Option<String>> {
  conn
    .query_row(
      "SELECT json_extract(body_json, '$.' || ?1)
       FROM documents WHERE id = ?2 AND collection = ?3",
      rusqlite::params![field, id, collection],
      |row| row.get::<_, Option<String>>(0),
    )
    .optional()
    .map(Option::flatten)
}

/// Turn a write outcome into the store's result.
fn settle(
  outcome: WriteOutcome,
  references: &[Reference],
  collection: Collection,
  id: Uuid,
) -> Result<()> {
  match outcome {
    WriteOutcome::Written => Ok(()),
    WriteOutcome::MissingReference(i) => {
      let missing = references[i];
      Err(Error::Core(campus_core::Error::MissingReference {
        field:      missing.field,
        collection: missing.collection,
        id:         missing.id,
      }))
    }
    WriteOutcome::Vanished => {
      Err(Error::Core(campus_core::Error::NotFound { collection, id }))
    }
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, email: String, token_hash: String) -> Result<User> {
    let user = User {
      user_id:    Uuid::new_v4(),
      email:      email.clone(),
      created_at: now(),
    };

    let id_str = encode_uuid(user.user_id);
    let at_str = encode_dt(user.created_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let taken = tx
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1",
            rusqlite::params![email],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(false);
        }
        tx.execute(
          "INSERT INTO users (user_id, email, token_hash, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, email, token_hash, at_str],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::Core(campus_core::Error::DuplicateEmail(user.email)));
    }

    tracing::debug!(user_id = %user.user_id, "user added");
    Ok(user)
  }

  async fn user_by_token_hash(&self, token_hash: String) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, email, created_at FROM users WHERE token_hash = ?1",
            rusqlite::params![token_hash],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Records ───────────────────────────────────────────────────────────────

  async fn insert<R: Resource>(&self, owner: Uuid, body: R) -> Result<Record<R>> {
    let at = now();
    let record = Record {
      id: Uuid::new_v4(),
      owner,
      created_at: at,
      updated_at: at,
      body,
    };

    let references = record.body.references();
    let refs       = encode_references(&references);
    let id_str     = encode_uuid(record.id);
    let owner_str  = encode_uuid(owner);
    let body_json  = serde_json::to_string(&record.body)?;
    let at_str     = encode_dt(at);
    let collection = R::COLLECTION.as_str();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if let Some(i) = first_missing(&tx, refs.iter().enumerate())? {
          return Ok(WriteOutcome::MissingReference(i));
        }
        tx.execute(
          "INSERT INTO documents (id, collection, owner, body_json, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![id_str, collection, owner_str, body_json, at_str],
        )?;
        tx.commit()?;
        Ok(WriteOutcome::Written)
      })
      .await?;

    settle(outcome, &references, R::COLLECTION, record.id)?;
    Ok(record)
  }

  async fn get<R: Resource>(&self, id: Uuid) -> Result<Option<Record<R>>> {
    let id_str     = encode_uuid(id);
    let collection = R::COLLECTION.as_str();

    let raw: Option<RawDocument> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, owner, body_json, created_at, updated_at
             FROM documents WHERE id = ?1 AND collection = ?2",
            rusqlite::params![id_str, collection],
            RawDocument::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawDocument::into_record).transpose()
  }

  async fn list<R: Resource>(&self) -> Result<Vec<Record<R>>> {
    let collection = R::COLLECTION.as_str();

    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, owner, body_json, created_at, updated_at
           FROM documents WHERE collection = ?1
           ORDER BY created_at, rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![collection], RawDocument::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocument::into_record).collect()
  }

  async fn update<R: Resource>(&self, mut record: Record<R>) -> Result<Record<R>> {
    record.updated_at = now();

    let references = record.body.references();
    let refs       = encode_references(&references);
    let id_str     = encode_uuid(record.id);
    let body_json  = serde_json::to_string(&record.body)?;
    let at_str     = encode_dt(record.updated_at);
    let collection = R::COLLECTION.as_str();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        // Unchanged references are not re-checked.
        let mut moved = Vec::with_capacity(refs.len());
        for (i, r) in refs.iter().enumerate() {
          let stored = stored_reference(&tx, &id_str, collection, r.field)?;
          if stored.as_deref() != Some(r.id.as_str()) {
            moved.push((i, r));
          }
        }
        if let Some(i) = first_missing(&tx, moved)? {
          return Ok(WriteOutcome::MissingReference(i));
        }
        let changed = tx.execute(
          "UPDATE documents SET body_json = ?1, updated_at = ?2
           WHERE id = ?3 AND collection = ?4",
          rusqlite::params![body_json, at_str, id_str, collection],
        )?;
        if changed == 0 {
          return Ok(WriteOutcome::Vanished);
        }
        tx.commit()?;
        Ok(WriteOutcome::Written)
      })
      .await?;

    settle(outcome, &references, R::COLLECTION, record.id)?;
    Ok(record)
  }

  async fn delete<R: Resource>(&self, id: Uuid) -> Result<bool> {
    let id_str     = encode_uuid(id);
    let collection = R::COLLECTION.as_str();

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM documents WHERE id = ?1 AND collection = ?2",
          rusqlite::params![id_str, collection],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }
}
