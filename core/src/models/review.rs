// storefront/src/models/review.rs

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Review {
  pub id: i64,
  pub product_id: i64,
  pub name: String,
  pub description: String,
  pub date: NaiveDate,
}
