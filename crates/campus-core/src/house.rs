//! Houses belong to a school.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  patch::{merge, non_blank},
  resource::{Collection, Reference, Resource},
  validate::{FieldErrors, require_id, require_text},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct House {
  pub name:   String,
  pub animal: String,
  pub slogan: String,
  /// The [`School`](crate::school::School) this house belongs to.
  pub school: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct HousePatch {
  #[serde(default, deserialize_with = "non_blank")]
  pub name:   Option<String>,
  #[serde(default, deserialize_with = "non_blank")]
  pub animal: Option<String>,
  #[serde(default, deserialize_with = "non_blank")]
  pub slogan: Option<String>,
  #[serde(default, deserialize_with = "non_blank")]
  pub school: Option<Uuid>,
}

impl Resource for House {
  const COLLECTION: Collection = Collection::Houses;
  const REFERENCE_FIELDS: &'static [&'static str] = &["school"];

  type Patch = HousePatch;

  fn validate(&self) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require_text(&mut errors, "name", &self.name);
    require_text(&mut errors, "animal", &self.animal);
    require_text(&mut errors, "slogan", &self.slogan);
    require_id(&mut errors, "school", self.school);
    errors.into_result()
  }

  fn apply(&mut self, patch: HousePatch) {
    merge(&mut self.name, patch.name);
    merge(&mut self.animal, patch.animal);
    merge(&mut self.slogan, patch.slogan);
    merge(&mut self.school, patch.school);
  }

  fn references(&self) -> Vec<Reference> {
    vec![Reference {
      field:      "school",
      collection: Collection::Schools,
      id:         self.school,
    }]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn gryffindor() -> House {
    House {
      name:   "Gryffindor".into(),
      animal: "Lion".into(),
      slogan: "Courage".into(),
      school: Uuid::new_v4(),
    }
  }

  #[test]
  fn blank_fields_leave_values_unchanged() {
    let mut house = gryffindor();
    let patch: HousePatch =
      serde_json::from_str(r#"{"name":"","animal":"Badger"}"#).unwrap();
    house.apply(patch);
    assert_eq!(house.name, "Gryffindor");
    assert_eq!(house.animal, "Badger");
    assert_eq!(house.slogan, "Courage");
  }

  #[test]
  fn owner_key_in_patch_is_ignored() {
    let mut house = gryffindor();
    let before = house.clone();
    let patch: HousePatch =
      serde_json::from_str(&format!(r#"{{"owner":"{}"}}"#, Uuid::new_v4()))
        .unwrap();
    house.apply(patch);
    assert_eq!(house, before);
  }

  #[test]
  fn missing_fields_fail_validation() {
    let house: House = serde_json::from_str(r#"{"name":"Hufflepuff"}"#).unwrap();
    let errors = house.validate().unwrap_err();
    assert!(errors.get("name").is_none());
    assert_eq!(errors.get("animal"), Some("is required"));
    assert_eq!(errors.get("school"), Some("is required"));
  }

  #[test]
  fn references_point_at_school() {
    let house = gryffindor();
    let refs = house.references();
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].collection, Collection::Schools);
    assert_eq!(refs[0].id, house.school);
    assert_eq!(House::REFERENCE_FIELDS, &[refs[0].field]);
  }
}
