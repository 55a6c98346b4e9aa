// storefront/src/models/cart.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Cart {
  pub id: Uuid,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CartItem {
  pub id: i64,
  pub cart_id: Uuid,
  pub product_id: i64,
  pub quantity: i32,
}

/// A cart item joined with the product fields its representation needs.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CartLine {
  pub id: i64,
  pub cart_id: Uuid,
  pub quantity: i32,
  pub product_id: i64,
  pub product_title: String,
  pub product_unit_price_cents: i32,
}

impl CartLine {
  /// Unit price times quantity, widened so large quantities cannot overflow.
  pub fn total_price_cents(&self) -> i64 {
    i64::from(self.product_unit_price_cents) * i64::from(self.quantity)
  }
}
