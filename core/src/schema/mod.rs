// storefront/src/schema/mod.rs

//! Wire representations. Payload types deserialize leniently (every field optional) and
//! `validate()` turns them into drafts, collecting one message list per offending field.
//! Representation types carry the computed fields clients see.

pub mod cart;
pub mod collection;
pub mod product;
pub mod review;

pub use cart::{AddCartItemPayload, CartItemRepr, CartRepr, NewCartItem, ProductSummary, UpdateCartItemPayload};
pub use collection::{CollectionDraft, CollectionPayload};
pub use product::{ProductDraft, ProductPayload, ProductRepr};
pub use review::{ReviewDraft, ReviewPayload};

use crate::error::ValidationErrors;

pub(crate) const REQUIRED: &str = "This field is required.";
pub(crate) const BLANK: &str = "This field may not be blank.";
pub(crate) const TITLE_MAX_CHARS: usize = 255;

/// Records "required" for a missing value.
pub(crate) fn required<T>(errors: &mut ValidationErrors, field: &str, value: Option<T>) -> Option<T> {
  if value.is_none() {
    errors.add(field, REQUIRED);
  }
  value
}

/// Trims and checks a required, length-limited text field.
pub(crate) fn required_text(
  errors: &mut ValidationErrors,
  field: &str,
  value: Option<String>,
  max_chars: Option<usize>,
) -> Option<String> {
  let value = required(errors, field, value)?;
  let trimmed = value.trim();
  if trimmed.is_empty() {
    errors.add(field, BLANK);
    return None;
  }
  if let Some(max) = max_chars {
    if trimmed.chars().count() > max {
      errors.add(field, format!("Ensure this field has no more than {} characters.", max));
      return None;
    }
  }
  Some(trimmed.to_string())
}

/// Checks an integer against an inclusive lower bound and narrows it to `i32`.
pub(crate) fn bounded_i32(errors: &mut ValidationErrors, field: &str, value: i64, min: i64) -> Option<i32> {
  if value < min {
    errors.add(field, format!("Ensure this value is greater than or equal to {}.", min));
    return None;
  }
  match i32::try_from(value) {
    Ok(v) => Some(v),
    Err(_) => {
      errors.add(field, format!("Ensure this value is less than or equal to {}.", i32::MAX));
      None
    }
  }
}

/// Lowercase ASCII slug: alphanumerics kept, every other run collapsed into one dash.
pub fn slugify(input: &str) -> String {
  let mut slug = String::with_capacity(input.len());
  let mut pending_dash = false;
  for ch in input.chars() {
    if ch.is_ascii_alphanumeric() {
      if pending_dash && !slug.is_empty() {
        slug.push('-');
      }
      pending_dash = false;
      slug.push(ch.to_ascii_lowercase());
    } else {
      pending_dash = true;
    }
  }
  slug
}
