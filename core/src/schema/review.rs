// storefront/src/schema/review.rs

use serde::Deserialize;

use super::{required_text, TITLE_MAX_CHARS};
use crate::error::{StorefrontError, StorefrontResult, ValidationErrors};
use crate::models::Review;

/// Review body. Any `product_id` sent by the client is not part of this type and is
/// dropped during deserialization: the parent product always comes from the path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewPayload {
  pub name: Option<String>,
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
  pub name: String,
  pub description: String,
}

impl ReviewPayload {
  pub fn merged_onto(self, existing: &Review) -> Self {
    ReviewPayload {
      name: self.name.or_else(|| Some(existing.name.clone())),
      description: self.description.or_else(|| Some(existing.description.clone())),
    }
  }

  pub fn validate(self) -> StorefrontResult<ReviewDraft> {
    let mut errors = ValidationErrors::new();
    let name = required_text(&mut errors, "name", self.name, Some(TITLE_MAX_CHARS));
    let description = required_text(&mut errors, "description", self.description, None);
    match (name, description) {
      (Some(name), Some(description)) => Ok(ReviewDraft { name, description }),
      _ => Err(StorefrontError::Validation(errors)),
    }
  }
}
