// storefront/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Product {
  pub id: i64,
  pub title: String,
  pub slug: String,
  pub description: Option<String>,
  pub unit_price_cents: i32,
  pub inventory: i32,
  pub last_update: DateTime<Utc>,
  pub collection_id: i64,
}
