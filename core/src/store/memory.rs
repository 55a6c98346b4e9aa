// storefront/src/store/memory.rs

//! In-process `CatalogStore` backed by ordered maps behind a single `parking_lot::RwLock`.
//!
//! Every trait method takes the lock once and releases it before returning, so each
//! operation is atomic with respect to the others. The foreign-key behaviour of the
//! Postgres schema (RESTRICT, CASCADE, SET NULL) is mirrored by hand.
//!
//! IMPORTANT: guards are never held across `.await`; none of these methods await while locked.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;
use uuid::Uuid;

use super::CatalogStore;
use crate::error::{StorefrontError, StorefrontResult, COLLECTION_HAS_PRODUCTS, PRODUCT_HAS_ORDERS, UNKNOWN_CART_PRODUCT};
use crate::models::{Cart, CartItem, CartLine, Collection, OrderItem, Product, Review};
use crate::query::{PageSlice, ProductQuery};
use crate::schema::{CollectionDraft, ProductDraft, ReviewDraft};

#[derive(Debug, Clone)]
struct CollectionRow {
  title: String,
  featured_product_id: Option<i64>,
}

#[derive(Debug, Default)]
struct Sequences {
  collection: i64,
  product: i64,
  review: i64,
  cart_item: i64,
  order: i64,
  order_item: i64,
}

fn next_id(seq: &mut i64) -> i64 {
  *seq += 1;
  *seq
}

#[derive(Debug, Default)]
struct Tables {
  seq: Sequences,
  collections: BTreeMap<i64, CollectionRow>,
  products: BTreeMap<i64, Product>,
  reviews: BTreeMap<i64, Review>,
  carts: HashMap<Uuid, Cart>,
  cart_items: BTreeMap<i64, CartItem>,
  order_items: BTreeMap<i64, OrderItem>,
}

impl Tables {
  fn collection(&self, id: i64) -> Option<Collection> {
    let row = self.collections.get(&id)?;
    Some(Collection {
      id,
      title: row.title.clone(),
      featured_product_id: row.featured_product_id,
      products_count: self.products_in_collection(id),
    })
  }

  fn products_in_collection(&self, id: i64) -> i64 {
    self.products.values().filter(|p| p.collection_id == id).count() as i64
  }

  fn check_featured_product(&self, draft: &CollectionDraft) -> StorefrontResult<()> {
    match draft.featured_product_id {
      Some(product_id) if !self.products.contains_key(&product_id) => {
        Err(StorefrontError::invalid_reference("featured_product_id", product_id))
      }
      _ => Ok(()),
    }
  }

  fn check_collection(&self, draft: &ProductDraft) -> StorefrontResult<()> {
    if self.collections.contains_key(&draft.collection_id) {
      Ok(())
    } else {
      Err(StorefrontError::invalid_reference("collection_id", draft.collection_id))
    }
  }

  fn line(&self, item: &CartItem) -> Option<CartLine> {
    let product = self.products.get(&item.product_id)?;
    Some(CartLine {
      id: item.id,
      cart_id: item.cart_id,
      quantity: item.quantity,
      product_id: product.id,
      product_title: product.title.clone(),
      product_unit_price_cents: product.unit_price_cents,
    })
  }

  fn scoped_item_mut(&mut self, cart_id: Uuid, id: i64) -> Option<&mut CartItem> {
    self.cart_items.get_mut(&id).filter(|item| item.cart_id == cart_id)
  }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Records an order line for `product_id` under a fresh order, the way checkout would.
  /// Order processing has no endpoints; this exists so the product delete guard can be
  /// exercised against this backend.
  pub fn record_order_item(&self, product_id: i64, quantity: i32) -> StorefrontResult<OrderItem> {
    let mut tables = self.tables.write();
    let unit_price_cents = tables
      .products
      .get(&product_id)
      .map(|p| p.unit_price_cents)
      .ok_or_else(|| StorefrontError::invalid_reference("product_id", product_id))?;
    let order_id = next_id(&mut tables.seq.order);
    let id = next_id(&mut tables.seq.order_item);
    let item = OrderItem {
      id,
      order_id,
      product_id,
      quantity,
      unit_price_cents,
    };
    tables.order_items.insert(id, item.clone());
    debug!(order_item_id = id, product_id, "Order item recorded in memory store.");
    Ok(item)
  }
}

#[async_trait]
impl CatalogStore for MemoryStore {
  async fn list_collections(&self) -> StorefrontResult<Vec<Collection>> {
    let tables = self.tables.read();
    Ok(tables.collections.keys().filter_map(|id| tables.collection(*id)).collect())
  }

  async fn get_collection(&self, id: i64) -> StorefrontResult<Option<Collection>> {
    Ok(self.tables.read().collection(id))
  }

  async fn insert_collection(&self, draft: &CollectionDraft) -> StorefrontResult<Collection> {
    let mut tables = self.tables.write();
    tables.check_featured_product(draft)?;
    let id = next_id(&mut tables.seq.collection);
    tables.collections.insert(
      id,
      CollectionRow {
        title: draft.title.clone(),
        featured_product_id: draft.featured_product_id,
      },
    );
    tables
      .collection(id)
      .ok_or_else(|| StorefrontError::Storage(anyhow::anyhow!("collection {} vanished after insert", id)))
  }

  async fn update_collection(&self, id: i64, draft: &CollectionDraft) -> StorefrontResult<Option<Collection>> {
    let mut tables = self.tables.write();
    tables.check_featured_product(draft)?;
    match tables.collections.get_mut(&id) {
      Some(row) => {
        row.title = draft.title.clone();
        row.featured_product_id = draft.featured_product_id;
      }
      None => return Ok(None),
    }
    Ok(tables.collection(id))
  }

  async fn count_products_in_collection(&self, id: i64) -> StorefrontResult<i64> {
    Ok(self.tables.read().products_in_collection(id))
  }

  async fn delete_collection(&self, id: i64) -> StorefrontResult<bool> {
    let mut tables = self.tables.write();
    if tables.products_in_collection(id) > 0 {
      return Err(StorefrontError::ReferentialGuard(COLLECTION_HAS_PRODUCTS.to_string()));
    }
    Ok(tables.collections.remove(&id).is_some())
  }

  async fn list_products(&self, query: &ProductQuery) -> StorefrontResult<PageSlice<Product>> {
    let tables = self.tables.read();
    let mut matching: Vec<&Product> = tables.products.values().filter(|p| query.matches(p)).collect();
    matching.sort_by(|a, b| query.compare(a, b));
    let total = matching.len() as u64;
    let items = matching
      .into_iter()
      .skip(query.page.offset() as usize)
      .take(query.page.limit() as usize)
      .cloned()
      .collect();
    Ok(PageSlice { items, total })
  }

  async fn get_product(&self, id: i64) -> StorefrontResult<Option<Product>> {
    Ok(self.tables.read().products.get(&id).cloned())
  }

  async fn insert_product(&self, draft: &ProductDraft) -> StorefrontResult<Product> {
    let mut tables = self.tables.write();
    tables.check_collection(draft)?;
    let id = next_id(&mut tables.seq.product);
    let product = Product {
      id,
      title: draft.title.clone(),
      slug: draft.slug.clone(),
      description: draft.description.clone(),
      unit_price_cents: draft.unit_price_cents,
      inventory: draft.inventory,
      last_update: Utc::now(),
      collection_id: draft.collection_id,
    };
    tables.products.insert(id, product.clone());
    Ok(product)
  }

  async fn update_product(&self, id: i64, draft: &ProductDraft) -> StorefrontResult<Option<Product>> {
    let mut tables = self.tables.write();
    tables.check_collection(draft)?;
    let Some(product) = tables.products.get_mut(&id) else {
      return Ok(None);
    };
    product.title = draft.title.clone();
    product.slug = draft.slug.clone();
    product.description = draft.description.clone();
    product.unit_price_cents = draft.unit_price_cents;
    product.inventory = draft.inventory;
    product.collection_id = draft.collection_id;
    product.last_update = Utc::now();
    Ok(Some(product.clone()))
  }

  async fn count_order_items_for_product(&self, id: i64) -> StorefrontResult<i64> {
    let tables = self.tables.read();
    Ok(tables.order_items.values().filter(|item| item.product_id == id).count() as i64)
  }

  async fn delete_product(&self, id: i64) -> StorefrontResult<bool> {
    let mut tables = self.tables.write();
    if tables.order_items.values().any(|item| item.product_id == id) {
      return Err(StorefrontError::ReferentialGuard(PRODUCT_HAS_ORDERS.to_string()));
    }
    if tables.products.remove(&id).is_none() {
      return Ok(false);
    }
    tables.reviews.retain(|_, review| review.product_id != id);
    tables.cart_items.retain(|_, item| item.product_id != id);
    for row in tables.collections.values_mut() {
      if row.featured_product_id == Some(id) {
        row.featured_product_id = None;
      }
    }
    Ok(true)
  }

  async fn list_reviews(&self, product_id: i64) -> StorefrontResult<Vec<Review>> {
    let tables = self.tables.read();
    Ok(tables.reviews.values().filter(|r| r.product_id == product_id).cloned().collect())
  }

  async fn get_review(&self, product_id: i64, id: i64) -> StorefrontResult<Option<Review>> {
    let tables = self.tables.read();
    Ok(tables.reviews.get(&id).filter(|r| r.product_id == product_id).cloned())
  }

  async fn insert_review(&self, product_id: i64, draft: &ReviewDraft) -> StorefrontResult<Review> {
    let mut tables = self.tables.write();
    if !tables.products.contains_key(&product_id) {
      return Err(StorefrontError::not_found("Product", product_id));
    }
    let id = next_id(&mut tables.seq.review);
    let review = Review {
      id,
      product_id,
      name: draft.name.clone(),
      description: draft.description.clone(),
      date: Utc::now().date_naive(),
    };
    tables.reviews.insert(id, review.clone());
    Ok(review)
  }

  async fn update_review(&self, product_id: i64, id: i64, draft: &ReviewDraft) -> StorefrontResult<Option<Review>> {
    let mut tables = self.tables.write();
    let Some(review) = tables.reviews.get_mut(&id).filter(|r| r.product_id == product_id) else {
      return Ok(None);
    };
    review.name = draft.name.clone();
    review.description = draft.description.clone();
    Ok(Some(review.clone()))
  }

  async fn delete_review(&self, product_id: i64, id: i64) -> StorefrontResult<bool> {
    let mut tables = self.tables.write();
    let in_scope = tables.reviews.get(&id).is_some_and(|r| r.product_id == product_id);
    if in_scope {
      tables.reviews.remove(&id);
    }
    Ok(in_scope)
  }

  async fn insert_cart(&self) -> StorefrontResult<Cart> {
    let mut tables = self.tables.write();
    let mut id = Uuid::new_v4();
    while tables.carts.contains_key(&id) {
      id = Uuid::new_v4();
    }
    let cart = Cart {
      id,
      created_at: Utc::now(),
    };
    tables.carts.insert(id, cart.clone());
    Ok(cart)
  }

  async fn get_cart(&self, id: Uuid) -> StorefrontResult<Option<Cart>> {
    Ok(self.tables.read().carts.get(&id).cloned())
  }

  async fn delete_cart(&self, id: Uuid) -> StorefrontResult<bool> {
    let mut tables = self.tables.write();
    if tables.carts.remove(&id).is_none() {
      return Ok(false);
    }
    tables.cart_items.retain(|_, item| item.cart_id != id);
    Ok(true)
  }

  async fn list_cart_items(&self, cart_id: Uuid) -> StorefrontResult<Vec<CartLine>> {
    let tables = self.tables.read();
    Ok(
      tables
        .cart_items
        .values()
        .filter(|item| item.cart_id == cart_id)
        .filter_map(|item| tables.line(item))
        .collect(),
    )
  }

  async fn get_cart_item(&self, cart_id: Uuid, id: i64) -> StorefrontResult<Option<CartLine>> {
    let tables = self.tables.read();
    Ok(
      tables
        .cart_items
        .get(&id)
        .filter(|item| item.cart_id == cart_id)
        .and_then(|item| tables.line(item)),
    )
  }

  async fn add_cart_item(&self, cart_id: Uuid, product_id: i64, quantity: i32) -> StorefrontResult<CartLine> {
    let mut guard = self.tables.write();
    let tables = &mut *guard;
    if !tables.carts.contains_key(&cart_id) {
      return Err(StorefrontError::not_found("Cart", cart_id));
    }
    if !tables.products.contains_key(&product_id) {
      return Err(StorefrontError::invalid("product_id", UNKNOWN_CART_PRODUCT));
    }

    let existing = tables
      .cart_items
      .values_mut()
      .find(|item| item.cart_id == cart_id && item.product_id == product_id);
    let item = match existing {
      Some(item) => {
        item.quantity = item
          .quantity
          .checked_add(quantity)
          .ok_or_else(|| StorefrontError::invalid("quantity", "Resulting quantity is too large."))?;
        debug!(cart_item_id = item.id, quantity = item.quantity, "Merged into existing cart item.");
        item.clone()
      }
      None => {
        let id = next_id(&mut tables.seq.cart_item);
        let item = CartItem {
          id,
          cart_id,
          product_id,
          quantity,
        };
        tables.cart_items.insert(id, item.clone());
        debug!(cart_item_id = id, quantity, "Inserted new cart item.");
        item
      }
    };

    tables
      .line(&item)
      .ok_or_else(|| StorefrontError::invalid("product_id", UNKNOWN_CART_PRODUCT))
  }

  async fn set_cart_item_quantity(&self, cart_id: Uuid, id: i64, quantity: i32) -> StorefrontResult<Option<CartLine>> {
    let mut tables = self.tables.write();
    let Some(item) = tables.scoped_item_mut(cart_id, id) else {
      return Ok(None);
    };
    item.quantity = quantity;
    let item = item.clone();
    Ok(tables.line(&item))
  }

  async fn delete_cart_item(&self, cart_id: Uuid, id: i64) -> StorefrontResult<bool> {
    let mut tables = self.tables.write();
    let in_scope = tables.scoped_item_mut(cart_id, id).is_some();
    if in_scope {
      tables.cart_items.remove(&id);
    }
    Ok(in_scope)
  }
}
