//! Survey responses. The answers live in a nested `response` object.

use serde::{Deserialize, Serialize};

use crate::{
  patch::{merge, non_blank},
  resource::{Collection, Resource},
  validate::{FieldErrors, require_text},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Response {
  pub response: Answers,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Answers {
  pub question_one: String,
  pub question_two: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponsePatch {
  #[serde(default, deserialize_with = "non_blank")]
  pub response: Option<AnswersPatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswersPatch {
  #[serde(default, deserialize_with = "non_blank")]
  pub question_one: Option<String>,
  #[serde(default, deserialize_with = "non_blank")]
  pub question_two: Option<String>,
}

impl Resource for Response {
  const COLLECTION: Collection = Collection::Responses;

  type Patch = ResponsePatch;

  fn validate(&self) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require_text(&mut errors, "response.questionOne", &self.response.question_one);
    require_text(&mut errors, "response.questionTwo", &self.response.question_two);
    errors.into_result()
  }

  fn apply(&mut self, patch: ResponsePatch) {
    if let Some(answers) = patch.response {
      merge(&mut self.response.question_one, answers.question_one);
      merge(&mut self.response.question_two, answers.question_two);
    }
  }
}
