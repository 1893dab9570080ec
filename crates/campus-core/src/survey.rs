//! Surveys. Each survey points at the [`Response`](crate::response::Response)
//! collected for it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  patch::{merge, non_blank},
  resource::{Collection, Reference, Resource},
  validate::{FieldErrors, require_id, require_text},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Survey {
  pub survey_title: String,
  pub survey_topic: String,
  pub survey_admin: String,
  pub response:     Uuid,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyPatch {
  #[serde(default, deserialize_with = "non_blank")]
  pub survey_title: Option<String>,
  #[serde(default, deserialize_with = "non_blank")]
  pub survey_topic: Option<String>,
  #[serde(default, deserialize_with = "non_blank")]
  pub survey_admin: Option<String>,
  #[serde(default, deserialize_with = "non_blank")]
  pub response:     Option<Uuid>,
}

impl Resource for Survey {
  const COLLECTION: Collection = Collection::Surveys;
  const REFERENCE_FIELDS: &'static [&'static str] = &["response"];

  type Patch = SurveyPatch;

  fn validate(&self) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require_text(&mut errors, "surveyTitle", &self.survey_title);
    require_text(&mut errors, "surveyTopic", &self.survey_topic);
    require_text(&mut errors, "surveyAdmin", &self.survey_admin);
    require_id(&mut errors, "response", self.response);
    errors.into_result()
  }

  fn apply(&mut self, patch: SurveyPatch) {
    merge(&mut self.survey_title, patch.survey_title);
    merge(&mut self.survey_topic, patch.survey_topic);
    merge(&mut self.survey_admin, patch.survey_admin);
    merge(&mut self.response, patch.response);
  }

  fn references(&self) -> Vec<Reference> {
    vec![Reference {
      field:      "response",
      collection: Collection::Responses,
      id:         self.response,
    }]
  }
}
