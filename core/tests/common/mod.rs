// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every fixture

use once_cell::sync::Lazy;
use storefront::models::Collection;
use storefront::schema::{CollectionPayload, ProductPayload, ProductRepr};
use storefront::services::{collections, products};
use storefront::MemoryStore;
use tracing::Level;

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn new_store() -> MemoryStore {
  setup_tracing();
  MemoryStore::new()
}

pub async fn create_collection(store: &MemoryStore, title: &str) -> Collection {
  collections::create_collection(
    store,
    CollectionPayload {
      title: Some(title.to_string()),
      featured_product_id: None,
    },
  )
  .await
  .expect("collection fixture should be valid")
}

pub fn product_payload(title: &str, unit_price_cents: i64, collection_id: i64) -> ProductPayload {
  ProductPayload {
    title: Some(title.to_string()),
    slug: None,
    description: None,
    unit_price_cents: Some(unit_price_cents),
    inventory: Some(10),
    collection_id: Some(collection_id),
  }
}

pub async fn create_product(store: &MemoryStore, title: &str, unit_price_cents: i64, collection_id: i64) -> ProductRepr {
  products::create_product(store, product_payload(title, unit_price_cents, collection_id))
    .await
    .expect("product fixture should be valid")
}

pub async fn create_described_product(
  store: &MemoryStore,
  title: &str,
  description: &str,
  unit_price_cents: i64,
  collection_id: i64,
) -> ProductRepr {
  let mut payload = product_payload(title, unit_price_cents, collection_id);
  payload.description = Some(description.to_string());
  products::create_product(store, payload)
    .await
    .expect("product fixture should be valid")
}
