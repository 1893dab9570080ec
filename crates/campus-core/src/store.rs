//! The `RecordStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `campus-store-sqlite`).
//! The API layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{Record, Resource, user::User};

/// Errors produced by a [`RecordStore`].
///
/// Backends wrap rejected writes (missing references, vanished rows,
/// duplicate emails) as a [`crate::Error`] and expose it through
/// [`StoreError::as_domain`]; everything else is an infrastructure failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn as_domain(&self) -> Option<&crate::Error>;
}

/// Abstraction over a Campus document store.
///
/// Every record lives in the collection named by its [`Resource::COLLECTION`].
/// Ids and timestamps are assigned by the store. Writes are last-write-wins;
/// there is no version check between a read and a later update.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: StoreError;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Register a user holding the token whose hash is `token_hash`.
  ///
  /// Fails with [`crate::Error::DuplicateEmail`] if `email` is taken.
  fn add_user(
    &self,
    email: String,
    token_hash: String,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Resolve a token hash to its user. Returns `None` if no user holds it.
  fn user_by_token_hash(
    &self,
    token_hash: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Records ───────────────────────────────────────────────────────────

  /// Persist a new record owned by `owner`.
  ///
  /// Fails with [`crate::Error::MissingReference`] if any of
  /// [`Resource::references`] does not exist.
  fn insert<R: Resource>(
    &self,
    owner: Uuid,
    body: R,
  ) -> impl Future<Output = Result<Record<R>, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get<R: Resource>(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Record<R>>, Self::Error>> + Send + '_;

  /// All records of the collection, oldest first, regardless of owner.
  fn list<R: Resource>(
    &self,
  ) -> impl Future<Output = Result<Vec<Record<R>>, Self::Error>> + Send + '_;

  /// Overwrite the body of an existing record and bump `updated_at`.
  ///
  /// `owner` and `created_at` are never rewritten. Fails with
  /// [`crate::Error::NotFound`] if the record has gone, and with
  /// [`crate::Error::MissingReference`] if a reference whose id differs from
  /// the stored one does not exist. Unchanged references are not re-checked.
  fn update<R: Resource>(
    &self,
    record: Record<R>,
  ) -> impl Future<Output = Result<Record<R>, Self::Error>> + Send + '_;

  /// Remove a record. Returns `false` if there was nothing to remove.
  fn delete<R: Resource>(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
