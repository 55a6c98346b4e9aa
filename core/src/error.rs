// storefront/src/error.rs
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Per-field validation messages, serialized as `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
  pub fn new() -> Self {
    Self::default()
  }

  /// Shorthand for an error set holding a single message.
  pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
    let mut errors = Self::new();
    errors.add(field, message);
    errors
  }

  pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.entry(field.into()).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn contains(&self, field: &str) -> bool {
    self.0.contains_key(field)
  }

  pub fn messages(&self, field: &str) -> &[String] {
    self.0.get(field).map(Vec::as_slice).unwrap_or_default()
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, messages) in &self.0 {
      if !first {
        f.write_str("; ")?;
      }
      first = false;
      write!(f, "{}: {}", field, messages.join(" "))?;
    }
    Ok(())
  }
}

#[derive(Debug, Error)]
pub enum StorefrontError {
  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Validation Error: {0}")]
  Validation(ValidationErrors),

  /// A delete was refused because other rows still reference the target.
  #[error("Operation Not Permitted: {0}")]
  ReferentialGuard(String),

  #[error("Storage Error: {0:#}")]
  Storage(#[from] anyhow::Error),
}

pub const PRODUCT_HAS_ORDERS: &str = "Cannot delete a product with associated orders";
pub const COLLECTION_HAS_PRODUCTS: &str =
  "Collection cannot be deleted because it is assigned to existing products.";
pub const UNKNOWN_CART_PRODUCT: &str = "No product with the given ID was found.";

impl StorefrontError {
  pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
    StorefrontError::NotFound(format!("{} with ID {} not found.", resource, id))
  }

  pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
    StorefrontError::Validation(ValidationErrors::single(field, message))
  }

  /// Validation error for a reference to a row that does not exist.
  pub fn invalid_reference(field: impl Into<String>, id: i64) -> Self {
    StorefrontError::invalid(field, format!("Invalid pk \"{}\" - object does not exist.", id))
  }
}

pub type StorefrontResult<T, E = StorefrontError> = std::result::Result<T, E>;
