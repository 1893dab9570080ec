//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure becomes a JSON body with a `message`. Validation failures add
//! an `errors` object keyed by field name. Ownership violations are reported
//! as `401`, matching what existing clients expect.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use campus_core::{store::StoreError, validate::FieldErrors};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthenticated: {0}")]
  Unauthenticated(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("forbidden: {0}")]
  NotOwner(String),

  #[error("validation failed: {0}")]
  Validation(FieldErrors),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a store failure: domain rejections keep their meaning, anything
  /// else is an internal error.
  pub fn from_store<E: StoreError>(err: E) -> Self {
    match err.as_domain() {
      Some(domain) => Self::from(domain.clone()),
      None => Self::Store(Box::new(err)),
    }
  }
}

impl From<campus_core::Error> for ApiError {
  fn from(err: campus_core::Error) -> Self {
    use campus_core::Error as E;
    let message = err.to_string();
    match err {
      E::NotFound { .. } => ApiError::NotFound(message),
      E::NotOwner { .. } => ApiError::NotOwner(message),
      E::MissingReference { field, .. } => {
        ApiError::Validation(FieldErrors::single(field, message))
      }
      E::Validation(errors) => ApiError::Validation(errors),
      E::DuplicateEmail(_) => ApiError::Conflict(message),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Unauthenticated(m) => {
        let mut res =
          (StatusCode::UNAUTHORIZED, Json(json!({ "message": m }))).into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Bearer realm=\"campus\""),
        );
        res
      }
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "message": m }))).into_response()
      }
      ApiError::NotOwner(m) => {
        tracing::debug!(reason = %m, "ownership check failed");
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": m }))).into_response()
      }
      ApiError::Validation(errors) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "message": "validation failed", "errors": errors })),
      )
        .into_response(),
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "message": m }))).into_response()
      }
      ApiError::Conflict(m) => {
        (StatusCode::CONFLICT, Json(json!({ "message": m }))).into_response()
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "message": "internal server error" })),
        )
          .into_response()
      }
    }
  }
}
