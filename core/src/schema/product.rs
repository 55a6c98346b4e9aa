// storefront/src/schema/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{bounded_i32, required, required_text, slugify, TITLE_MAX_CHARS};
use crate::error::{StorefrontError, StorefrontResult, ValidationErrors};
use crate::models::Product;

/// Tax applied to `price_with_tax_cents`, in percent.
pub const TAX_PERCENT: i64 = 10;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPayload {
  pub title: Option<String>,
  pub slug: Option<String>,
  pub description: Option<String>,
  pub unit_price_cents: Option<i64>,
  pub inventory: Option<i64>,
  pub collection_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
  pub title: String,
  pub slug: String,
  pub description: Option<String>,
  pub unit_price_cents: i32,
  pub inventory: i32,
  pub collection_id: i64,
}

impl ProductPayload {
  /// Fills every field the client left out from the stored product (PATCH semantics).
  /// The stored slug is kept unless a new one is sent, even when the title changes.
  pub fn merged_onto(self, existing: &Product) -> Self {
    ProductPayload {
      title: self.title.or_else(|| Some(existing.title.clone())),
      slug: self.slug.or_else(|| Some(existing.slug.clone())),
      description: self.description.or_else(|| existing.description.clone()),
      unit_price_cents: self.unit_price_cents.or(Some(i64::from(existing.unit_price_cents))),
      inventory: self.inventory.or(Some(i64::from(existing.inventory))),
      collection_id: self.collection_id.or(Some(existing.collection_id)),
    }
  }

  /// Field-level checks only. Whether `collection_id` points at a real collection is
  /// decided by the product service against the store.
  pub fn validate(self) -> StorefrontResult<ProductDraft> {
    let mut errors = ValidationErrors::new();

    let title = required_text(&mut errors, "title", self.title, Some(TITLE_MAX_CHARS));
    let unit_price_cents = required(&mut errors, "unit_price_cents", self.unit_price_cents)
      .and_then(|price| bounded_i32(&mut errors, "unit_price_cents", price, 1));
    let inventory = bounded_i32(&mut errors, "inventory", self.inventory.unwrap_or(0), 0);
    let collection_id = required(&mut errors, "collection_id", self.collection_id);

    let slug = match (self.slug, title.as_deref()) {
      (Some(explicit), _) => Some(slugify(&explicit)),
      (None, Some(title)) => Some(slugify(title)),
      (None, None) => None,
    };
    if matches!(slug.as_deref(), Some("")) {
      errors.add("slug", "Enter a valid slug consisting of letters, numbers, underscores or hyphens.");
    }

    let description = self
      .description
      .map(|d| d.trim().to_string())
      .filter(|d| !d.is_empty());

    match (title, slug, unit_price_cents, inventory, collection_id) {
      (Some(title), Some(slug), Some(unit_price_cents), Some(inventory), Some(collection_id)) if errors.is_empty() => {
        Ok(ProductDraft {
          title,
          slug,
          description,
          unit_price_cents,
          inventory,
          collection_id,
        })
      }
      _ => Err(StorefrontError::Validation(errors)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRepr {
  pub id: i64,
  pub title: String,
  pub slug: String,
  pub description: Option<String>,
  pub inventory: i32,
  pub unit_price_cents: i32,
  pub price_with_tax_cents: i64,
  pub last_update: DateTime<Utc>,
  pub collection_id: i64,
}

/// Unit price plus tax, rounded half up to the cent.
pub fn price_with_tax_cents(unit_price_cents: i32) -> i64 {
  (i64::from(unit_price_cents) * (100 + TAX_PERCENT) + 50) / 100
}

impl From<Product> for ProductRepr {
  fn from(product: Product) -> Self {
    ProductRepr {
      price_with_tax_cents: price_with_tax_cents(product.unit_price_cents),
      id: product.id,
      title: product.title,
      slug: product.slug,
      description: product.description,
      inventory: product.inventory,
      unit_price_cents: product.unit_price_cents,
      last_update: product.last_update,
      collection_id: product.collection_id,
    }
  }
}
