use serde::{Deserialize, Serialize};

use crate::{
  patch::{merge, non_blank},
  resource::{Collection, Resource},
  validate::{FieldErrors, require_text},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct School {
  pub name:          String,
  pub location:      String,
  pub administrator: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SchoolPatch {
  #[serde(default, deserialize_with = "non_blank")]
  pub name:          Option<String>,
  #[serde(default, deserialize_with = "non_blank")]
  pub location:      Option<String>,
  #[serde(default, deserialize_with = "non_blank")]
  pub administrator: Option<String>,
}

impl Resource for School {
  const COLLECTION: Collection = Collection::Schools;

  type Patch = SchoolPatch;

  fn validate(&self) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require_text(&mut errors, "name", &self.name);
    require_text(&mut errors, "location", &self.location);
    require_text(&mut errors, "administrator", &self.administrator);
    errors.into_result()
  }

  fn apply(&mut self, patch: SchoolPatch) {
    merge(&mut self.name, patch.name);
    merge(&mut self.location, patch.location);
    merge(&mut self.administrator, patch.administrator);
  }
}
