//! JSON REST API for Campus.
//!
//! Exposes an axum [`Router`] backed by any [`campus_core::store::RecordStore`].
//! Every route requires a bearer token; TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = campus_api::api_router(Arc::new(store));
//! ```

pub mod auth;
pub mod error;
pub mod mount;
pub mod resource;

use std::sync::Arc;

use axum::Router;
use campus_core::store::RecordStore;

pub use error::ApiError;

use mount::{Houses, Responses, Schools, Students, Surveys};

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    .merge(resource::routes::<S, Houses>())
    .merge(resource::routes::<S, Schools>())
    .merge(resource::routes::<S, Surveys>())
    .merge(resource::routes::<S, Students>())
    .merge(resource::routes::<S, Responses>())
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
