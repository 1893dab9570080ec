//! Error types for `campus-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::{resource::Collection, validate::FieldErrors};

/// Domain failures. Every variant describes a rejected request rather than an
/// infrastructure fault, so the API layer can map each one to a status code.
#[derive(Debug, Clone, Error)]
pub enum Error {
  #[error("{collection} record {id} not found")]
  NotFound { collection: Collection, id: Uuid },

  #[error("{field} refers to {collection} record {id}, which does not exist")]
  MissingReference {
    field:      &'static str,
    collection: Collection,
    id:         Uuid,
  },

  #[error("user {requester} does not own {collection} record {id}")]
  NotOwner {
    requester:  Uuid,
    collection: Collection,
    id:         Uuid,
  },

  #[error("validation failed: {0}")]
  Validation(FieldErrors),

  #[error("email already registered: {0}")]
  DuplicateEmail(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
