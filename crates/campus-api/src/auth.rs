//! Bearer-token authentication.
//!
//! Tokens are opaque random strings handed out once at provisioning time. The
//! store only ever sees their SHA-256 hash.

use std::sync::Arc;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use campus_core::{store::RecordStore, user::User};
use rand_core::{OsRng, RngCore as _};
use sha2::{Digest as _, Sha256};
use uuid::Uuid;

use crate::error::ApiError;

/// The authenticated user behind the current request.
///
/// Taking this as a handler argument makes the route require a valid bearer
/// token; the request is rejected with `401` before the handler runs
/// otherwise.
#[derive(Debug, Clone)]
pub struct Requester(pub User);

impl Requester {
  pub fn id(&self) -> Uuid { self.0.user_id }
}

/// A freshly issued token. `token` is shown to the user once; `hash` is what
/// gets stored.
pub struct IssuedToken {
  pub token: String,
  pub hash:  String,
}

/// Hex-encoded SHA-256 of `token`.
pub fn hash_token(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}

/// Generate 32 random bytes from the OS and hex-encode them.
pub fn issue_token() -> IssuedToken {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  let token = hex::encode(bytes);
  IssuedToken { hash: hash_token(&token), token }
}

/// Create a user with a new token. Returns the user and the plaintext token.
pub async fn provision_user<S: RecordStore>(
  store: &S,
  email: String,
) -> Result<(User, String), S::Error> {
  let issued = issue_token();
  let user = store.add_user(email, issued.hash).await?;
  tracing::info!(user_id = %user.user_id, email = %user.email, "provisioned user");
  Ok((user, issued.token))
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
  let value = headers
    .get(header::AUTHORIZATION)
    .ok_or_else(|| ApiError::Unauthenticated("missing bearer token".into()))?
    .to_str()
    .map_err(|_| ApiError::Unauthenticated("malformed authorization header".into()))?;

  let token = value
    .strip_prefix("Bearer ")
    .ok_or_else(|| ApiError::Unauthenticated("expected a bearer token".into()))?
    .trim();

  if token.is_empty() {
    return Err(ApiError::Unauthenticated("missing bearer token".into()));
  }
  Ok(token)
}

impl<S> FromRequestParts<Arc<S>> for Requester
where
  S: RecordStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    store: &Arc<S>,
  ) -> Result<Self, Self::Rejection> {
    let hash = hash_token(bearer_token(&parts.headers)?);
    let user = store
      .user_by_token_hash(hash)
      .await
      .map_err(ApiError::from_store)?
      .ok_or_else(|| ApiError::Unauthenticated("invalid bearer token".into()))?;
    Ok(Requester(user))
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    h
  }

  #[test]
  fn extracts_bearer_token() {
    assert_eq!(bearer_token(&headers("Bearer abc123")).unwrap(), "abc123");
  }

  #[test]
  fn rejects_missing_header() {
    assert!(matches!(
      bearer_token(&HeaderMap::new()),
      Err(ApiError::Unauthenticated(_))
    ));
  }

  #[test]
  fn rejects_other_schemes() {
    assert!(bearer_token(&headers("Basic dXNlcjpwYXNz")).is_err());
  }

  #[test]
  fn rejects_empty_token() {
    assert!(bearer_token(&headers("Bearer    ")).is_err());
  }

  #[test]
  fn issued_tokens_are_unique_and_hash_consistently() {
    let a = issue_token();
    let b = issue_token();
    assert_ne!(a.token, b.token);
    assert_eq!(a.token.len(), 64);
    assert_eq!(hash_token(&a.token), a.hash);
    assert_ne!(a.hash, a.token);
  }
}
