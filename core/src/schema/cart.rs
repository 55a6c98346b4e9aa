// storefront/src/schema/cart.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{bounded_i32, required};
use crate::error::{StorefrontError, StorefrontResult, ValidationErrors};
use crate::models::{Cart, CartLine};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddCartItemPayload {
  pub product_id: Option<i64>,
  pub quantity: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartItem {
  pub product_id: i64,
  pub quantity: i32,
}

impl AddCartItemPayload {
  pub fn validate(self) -> StorefrontResult<NewCartItem> {
    let mut errors = ValidationErrors::new();
    let product_id = required(&mut errors, "product_id", self.product_id);
    let quantity = required(&mut errors, "quantity", self.quantity).and_then(|q| bounded_i32(&mut errors, "quantity", q, 1));
    match (product_id, quantity) {
      (Some(product_id), Some(quantity)) => Ok(NewCartItem { product_id, quantity }),
      _ => Err(StorefrontError::Validation(errors)),
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCartItemPayload {
  pub quantity: Option<i64>,
}

impl UpdateCartItemPayload {
  pub fn validate(self) -> StorefrontResult<i32> {
    let mut errors = ValidationErrors::new();
    let quantity = required(&mut errors, "quantity", self.quantity).and_then(|q| bounded_i32(&mut errors, "quantity", q, 1));
    match quantity {
      Some(quantity) => Ok(quantity),
      None => Err(StorefrontError::Validation(errors)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSummary {
  pub id: i64,
  pub title: String,
  pub unit_price_cents: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemRepr {
  pub id: i64,
  pub product: ProductSummary,
  pub quantity: i32,
  pub total_price_cents: i64,
}

impl From<CartLine> for CartItemRepr {
  fn from(line: CartLine) -> Self {
    CartItemRepr {
      total_price_cents: line.total_price_cents(),
      id: line.id,
      product: ProductSummary {
        id: line.product_id,
        title: line.product_title,
        unit_price_cents: line.product_unit_price_cents,
      },
      quantity: line.quantity,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartRepr {
  pub id: Uuid,
  pub created_at: DateTime<Utc>,
  pub items: Vec<CartItemRepr>,
  pub total_price_cents: i64,
}

impl CartRepr {
  pub fn new(cart: Cart, lines: Vec<CartLine>) -> Self {
    let items: Vec<CartItemRepr> = lines.into_iter().map(CartItemRepr::from).collect();
    // Lines can each approach 2^62, so the sum clamps instead of overflowing.
    let total_price_cents = items
      .iter()
      .fold(0i64, |total, item| total.saturating_add(item.total_price_cents));
    CartRepr {
      id: cart.id,
      created_at: cart.created_at,
      items,
      total_price_cents,
    }
  }
}
