// storefront/src/store/mod.rs

//! Persistence seam. Services only talk to `dyn CatalogStore`; the concrete backend is
//! chosen at startup (`PgStore` in production, `MemoryStore` for local runs and tests).

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StorefrontResult;
use crate::models::{Cart, CartLine, Collection, Product, Review};
use crate::query::{PageSlice, ProductQuery};
use crate::schema::{CollectionDraft, ProductDraft, ReviewDraft};

pub mod memory;
pub mod postgres;

/// Storage operations behind the catalog and cart endpoints.
///
/// Lookups return `Ok(None)` / `Ok(false)` when the row does not exist in the given scope;
/// turning that into a not-found response is the caller's job.
#[async_trait]
pub trait CatalogStore: Send + Sync {
  // --- Collections ---
  async fn list_collections(&self) -> StorefrontResult<Vec<Collection>>;
  async fn get_collection(&self, id: i64) -> StorefrontResult<Option<Collection>>;
  async fn insert_collection(&self, draft: &CollectionDraft) -> StorefrontResult<Collection>;
  async fn update_collection(&self, id: i64, draft: &CollectionDraft) -> StorefrontResult<Option<Collection>>;
  async fn count_products_in_collection(&self, id: i64) -> StorefrontResult<i64>;
  /// Fails with `ReferentialGuard` if products were assigned concurrently.
  async fn delete_collection(&self, id: i64) -> StorefrontResult<bool>;

  // --- Products ---
  async fn list_products(&self, query: &ProductQuery) -> StorefrontResult<PageSlice<Product>>;
  async fn get_product(&self, id: i64) -> StorefrontResult<Option<Product>>;
  async fn insert_product(&self, draft: &ProductDraft) -> StorefrontResult<Product>;
  async fn update_product(&self, id: i64, draft: &ProductDraft) -> StorefrontResult<Option<Product>>;
  async fn count_order_items_for_product(&self, id: i64) -> StorefrontResult<i64>;
  /// Removes the product with its reviews and cart items. Fails with `ReferentialGuard`
  /// if an order item was recorded concurrently.
  async fn delete_product(&self, id: i64) -> StorefrontResult<bool>;

  // --- Reviews (always scoped to their product) ---
  async fn list_reviews(&self, product_id: i64) -> StorefrontResult<Vec<Review>>;
  async fn get_review(&self, product_id: i64, id: i64) -> StorefrontResult<Option<Review>>;
  async fn insert_review(&self, product_id: i64, draft: &ReviewDraft) -> StorefrontResult<Review>;
  async fn update_review(&self, product_id: i64, id: i64, draft: &ReviewDraft) -> StorefrontResult<Option<Review>>;
  async fn delete_review(&self, product_id: i64, id: i64) -> StorefrontResult<bool>;

  // --- Carts ---
  async fn insert_cart(&self) -> StorefrontResult<Cart>;
  async fn get_cart(&self, id: Uuid) -> StorefrontResult<Option<Cart>>;
  /// Removes the cart and all of its items.
  async fn delete_cart(&self, id: Uuid) -> StorefrontResult<bool>;

  // --- Cart items (always scoped to their cart, joined with the product) ---
  async fn list_cart_items(&self, cart_id: Uuid) -> StorefrontResult<Vec<CartLine>>;
  async fn get_cart_item(&self, cart_id: Uuid, id: i64) -> StorefrontResult<Option<CartLine>>;
  /// Inserts the `(cart, product)` line or adds `quantity` to the existing one, atomically.
  async fn add_cart_item(&self, cart_id: Uuid, product_id: i64, quantity: i32) -> StorefrontResult<CartLine>;
  async fn set_cart_item_quantity(&self, cart_id: Uuid, id: i64, quantity: i32) -> StorefrontResult<Option<CartLine>>;
  async fn delete_cart_item(&self, cart_id: Uuid, id: i64) -> StorefrontResult<bool>;
}
