// storefront/src/schema/collection.rs

use serde::Deserialize;

use super::{required_text, TITLE_MAX_CHARS};
use crate::error::{StorefrontError, StorefrontResult, ValidationErrors};
use crate::models::Collection;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionPayload {
  pub title: Option<String>,
  #[serde(default)]
  pub featured_product_id: Option<i64>,
}

/// A validated collection, ready to insert or to replace an existing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDraft {
  pub title: String,
  pub featured_product_id: Option<i64>,
}

impl CollectionPayload {
  /// Fills every field the client left out from the stored collection (PATCH semantics).
  pub fn merged_onto(self, existing: &Collection) -> Self {
    CollectionPayload {
      title: self.title.or_else(|| Some(existing.title.clone())),
      featured_product_id: self.featured_product_id.or(existing.featured_product_id),
    }
  }

  pub fn validate(self) -> StorefrontResult<CollectionDraft> {
    let mut errors = ValidationErrors::new();
    match required_text(&mut errors, "title", self.title, Some(TITLE_MAX_CHARS)) {
      Some(title) => Ok(CollectionDraft {
        title,
        featured_product_id: self.featured_product_id,
      }),
      None => Err(StorefrontError::Validation(errors)),
    }
  }
}
