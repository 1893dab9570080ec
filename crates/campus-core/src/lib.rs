//! Core types and trait definitions for the Campus record service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store and API crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod house;
pub mod ownership;
pub mod patch;
pub mod resource;
pub mod response;
pub mod school;
pub mod store;
pub mod survey;
pub mod user;
pub mod validate;

pub use error::{Error, Result};
pub use resource::{Collection, Record, Reference, Resource};
