//! Where each resource is exposed over HTTP and what its JSON envelopes are
//! called.
//!
//! A mount ties a [`Resource`] to a URL segment (`/houses`) and to the keys
//! that wrap request and response bodies (`{"house": {...}}`,
//! `{"houses": [...]}`). The same resource may be mounted more than once.

use campus_core::{
  Resource, house::House, response::Response, school::School, survey::Survey,
};

pub trait Mount: Send + Sync + 'static {
  type Resource: Resource;

  /// Path segment and list envelope key.
  const PLURAL: &'static str;

  /// Single-record envelope key.
  const SINGULAR: &'static str;
}

pub struct Houses;

impl Mount for Houses {
  type Resource = House;

  const PLURAL: &'static str = "houses";
  const SINGULAR: &'static str = "house";
}

pub struct Schools;

impl Mount for Schools {
  type Resource = School;

  const PLURAL: &'static str = "schools";
  const SINGULAR: &'static str = "school";
}

pub struct Surveys;

impl Mount for Surveys {
  type Resource = Survey;

  const PLURAL: &'static str = "surveys";
  const SINGULAR: &'static str = "survey";
}

/// Older clients address surveys as students. Same collection, different
/// envelope keys.
pub struct Students;

impl Mount for Students {
  type Resource = Survey;

  const PLURAL: &'static str = "students";
  const SINGULAR: &'static str = "student";
}

pub struct Responses;

impl Mount for Responses {
  type Resource = Response;

  const PLURAL: &'static str = "responses";
  const SINGULAR: &'static str = "response";
}
