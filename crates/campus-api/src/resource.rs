//! The CRUD handler set shared by every mount.
//!
//! | Method   | Path       | Success | Failure |
//! |----------|------------|---------|---------|
//! | `GET`    | `/R`       | 200 `{R: [...]}` | 401 |
//! | `GET`    | `/R/:id`   | 200 `{r: {...}}` | 401, 404 |
//! | `POST`   | `/R`       | 201 `{r: {...}}` | 401, 422 |
//! | `PATCH`  | `/R/:id`   | 204 | 401 (also non-owner), 404, 422 |
//! | `DELETE` | `/R/:id`   | 204 | 401 (also non-owner), 404 |
//!
//! Reads are open to every authenticated user. Writes to an existing record
//! run the not-found check first, then the ownership check, and only then
//! touch the store.

use std::{fmt::Display, sync::Arc};

use axum::{
  Json, Router,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
  routing::get,
};
use campus_core::{
  Record, Resource, ownership::require_owner, store::RecordStore,
  validate::FieldErrors,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{auth::Requester, error::ApiError, mount::Mount};

/// Routes for one mount: `/{plural}` and `/{plural}/{id}`.
pub fn routes<S, M>() -> Router<Arc<S>>
where
  S: RecordStore + 'static,
  M: Mount,
{
  let collection = format!("/{}", M::PLURAL);
  let member = format!("/{}/{{id}}", M::PLURAL);
  Router::new()
    .route(&collection, get(list::<S, M>).post(create::<S, M>))
    .route(
      &member,
      get(get_one::<S, M>)
        .patch(update::<S, M>)
        .delete(remove::<S, M>),
    )
}

// ─── Envelopes ────────────────────────────────────────────────────────────────

/// Wrap `value` as `{key: value}`.
fn envelope<T: Serialize>(key: &str, value: T) -> Result<Json<Value>, ApiError> {
  let value = serde_json::to_value(value).map_err(|e| ApiError::Store(Box::new(e)))?;
  let mut map = Map::new();
  map.insert(key.to_owned(), value);
  Ok(Json(Value::Object(map)))
}

/// Take the object stored under `key` out of a request body.
fn open_envelope(
  key: &str,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Value, ApiError> {
  let Json(mut body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  match body.get_mut(key).map(Value::take) {
    Some(fields @ Value::Object(_)) => Ok(fields),
    _ => Err(ApiError::Validation(FieldErrors::single(key, "is required"))),
  }
}

/// Check the reference ids in `fields` so a bad id is reported under its own
/// field. Empty ids are dropped and left to [`Resource::validate`] on create
/// and to the blank-field rule on update.
fn screen_references<R: Resource>(fields: &mut Value) -> Result<(), ApiError> {
  let Value::Object(map) = fields else {
    return Ok(());
  };
  let mut errors = FieldErrors::new();
  for &field in R::REFERENCE_FIELDS {
    let blank = match map.get(field) {
      None => false,
      Some(Value::Null) => true,
      Some(Value::String(s)) if s.is_empty() => true,
      Some(Value::String(s)) if Uuid::parse_str(s).is_ok() => false,
      Some(_) => {
        errors.push(field, "is not a valid id");
        false
      }
    };
    if blank {
      map.remove(field);
    }
  }
  errors.into_result().map_err(ApiError::Validation)
}

fn decode<T: DeserializeOwned>(key: &str, fields: Value) -> Result<T, ApiError> {
  serde_json::from_value(fields)
    .map_err(|e| ApiError::Validation(FieldErrors::single(key, e.to_string())))
}

// ─── Lookup ───────────────────────────────────────────────────────────────────

fn not_found<M: Mount>(id: impl Display) -> ApiError {
  ApiError::NotFound(format!("{} {id} not found", M::SINGULAR))
}

/// Load the record addressed by the path. An id that is not a UUID cannot
/// match anything, so it is reported as not found.
async fn fetch<S, M>(store: &S, raw_id: &str) -> Result<Record<M::Resource>, ApiError>
where
  S: RecordStore,
  M: Mount,
{
  let id = Uuid::parse_str(raw_id).map_err(|_| not_found::<M>(raw_id))?;
  store
    .get::<M::Resource>(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| not_found::<M>(id))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /R`: every record in the collection, whoever owns it.
pub async fn list<S, M>(
  State(store): State<Arc<S>>,
  _requester: Requester,
) -> Result<Json<Value>, ApiError>
where
  S: RecordStore + 'static,
  M: Mount,
{
  let records = store
    .list::<M::Resource>()
    .await
    .map_err(ApiError::from_store)?;
  envelope(M::PLURAL, records)
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /R/:id`
pub async fn get_one<S, M>(
  State(store): State<Arc<S>>,
  _requester: Requester,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: RecordStore + 'static,
  M: Mount,
{
  let record = fetch::<S, M>(store.as_ref(), &id).await?;
  envelope(M::SINGULAR, record)
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /R`: body `{r: {...}}`. The requester becomes the owner; any
/// `owner` the client sent is ignored.
pub async fn create<S, M>(
  State(store): State<Arc<S>>,
  requester: Requester,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + 'static,
  M: Mount,
{
  let mut fields = open_envelope(M::SINGULAR, body)?;
  screen_references::<M::Resource>(&mut fields)?;
  let draft: M::Resource = decode(M::SINGULAR, fields)?;
  draft.validate().map_err(ApiError::Validation)?;

  let record = store
    .insert(requester.id(), draft)
    .await
    .map_err(ApiError::from_store)?;

  let collection = <M::Resource as Resource>::COLLECTION;
  tracing::debug!(
    %collection,
    id = %record.id,
    owner = %record.owner,
    "record created"
  );
  Ok((StatusCode::CREATED, envelope(M::SINGULAR, record)?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /R/:id`: body `{r: {...}}`. Fields sent as `""` are left as they
/// are; the rest are merged into the stored record.
pub async fn update<S, M>(
  State(store): State<Arc<S>>,
  requester: Requester,
  Path(id): Path<String>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore + 'static,
  M: Mount,
{
  let mut record = fetch::<S, M>(store.as_ref(), &id).await?;
  require_owner(requester.id(), &record)?;

  let mut fields = open_envelope(M::SINGULAR, body)?;
  screen_references::<M::Resource>(&mut fields)?;
  let patch: <M::Resource as Resource>::Patch = decode(M::SINGULAR, fields)?;
  record.body.apply(patch);
  record.body.validate().map_err(ApiError::Validation)?;

  store.update(record).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /R/:id`
pub async fn remove<S, M>(
  State(store): State<Arc<S>>,
  requester: Requester,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore + 'static,
  M: Mount,
{
  let record = fetch::<S, M>(store.as_ref(), &id).await?;
  require_owner(requester.id(), &record)?;

  let removed = store
    .delete::<M::Resource>(record.id)
    .await
    .map_err(ApiError::from_store)?;
  if !removed {
    return Err(not_found::<M>(record.id));
  }
  Ok(StatusCode::NO_CONTENT)
}
