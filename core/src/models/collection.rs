// storefront/src/models/collection.rs

use serde::Serialize;
use sqlx::FromRow;

/// A collection row, always read together with the number of products assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Collection {
  pub id: i64,
  pub title: String,
  pub featured_product_id: Option<i64>,
  pub products_count: i64,
}
