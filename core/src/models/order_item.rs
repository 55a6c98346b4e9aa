// storefront/src/models/order_item.rs

use serde::Serialize;
use sqlx::FromRow;

/// Historical order line. Only consulted to decide whether a product may be deleted.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
  pub id: i64,
  pub order_id: i64,
  pub product_id: i64,
  pub quantity: i32,
  pub unit_price_cents: i32,
}
