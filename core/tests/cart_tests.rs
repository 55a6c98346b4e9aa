// tests/cart_tests.rs
mod common;
use common::*;
use std::sync::Arc;
use storefront::schema::{AddCartItemPayload, UpdateCartItemPayload};
use storefront::services::{carts, products};
use storefront::{MemoryStore, StorefrontError};
use uuid::Uuid;

fn add(product_id: i64, quantity: i64) -> AddCartItemPayload {
  AddCartItemPayload {
    product_id: Some(product_id),
    quantity: Some(quantity),
  }
}

fn set_quantity(quantity: i64) -> UpdateCartItemPayload {
  UpdateCartItemPayload {
    quantity: Some(quantity),
  }
}

#[tokio::test]
async fn test_new_carts_are_empty_and_distinct() {
  let store = new_store();
  let first = carts::create_cart(&store).await.unwrap();
  let second = carts::create_cart(&store).await.unwrap();

  assert_ne!(first.id, second.id);
  assert!(first.items.is_empty());
  assert_eq!(first.total_price_cents, 0);

  let fetched = carts::get_cart(&store, first.id).await.unwrap();
  assert_eq!(fetched.id, first.id);
  assert!(fetched.items.is_empty());
}

#[tokio::test]
async fn test_adding_same_product_twice_merges_quantities() {
  let store = new_store();
  let grocery = create_collection(&store, "Grocery").await;
  let bread = create_product(&store, "Bread", 250, grocery.id).await;
  let cart = carts::create_cart(&store).await.unwrap();

  let first = carts::add_cart_item(&store, cart.id, add(bread.id, 2)).await.unwrap();
  let second = carts::add_cart_item(&store, cart.id, add(bread.id, 3)).await.unwrap();

  assert_eq!(first.id, second.id);
  assert_eq!(second.quantity, 5);
  assert_eq!(second.total_price_cents, 1250);

  let items = carts::list_cart_items(&store, cart.id).await.unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].product.title, "Bread");
}

#[tokio::test]
async fn test_cart_total_sums_item_totals() {
  let store = new_store();
  let grocery = create_collection(&store, "Grocery").await;
  let bread = create_product(&store, "Bread", 250, grocery.id).await;
  let milk = create_product(&store, "Milk", 199, grocery.id).await;
  let cart = carts::create_cart(&store).await.unwrap();

  carts::add_cart_item(&store, cart.id, add(bread.id, 2)).await.unwrap();
  carts::add_cart_item(&store, cart.id, add(milk.id, 3)).await.unwrap();

  let fetched = carts::get_cart(&store, cart.id).await.unwrap();
  let totals: Vec<i64> = fetched.items.iter().map(|i| i.total_price_cents).collect();
  assert_eq!(totals, vec![500, 597]);
  assert_eq!(fetched.total_price_cents, 1097);
}

#[tokio::test]
async fn test_add_rejects_bad_quantity_and_unknown_product() {
  let store = new_store();
  let grocery = create_collection(&store, "Grocery").await;
  let bread = create_product(&store, "Bread", 250, grocery.id).await;
  let cart = carts::create_cart(&store).await.unwrap();

  match carts::add_cart_item(&store, cart.id, add(bread.id, 0)).await {
    Err(StorefrontError::Validation(errors)) => assert!(errors.contains("quantity")),
    other => panic!("Expected validation error, got {:?}", other),
  }

  match carts::add_cart_item(&store, cart.id, add(9999, 1)).await {
    Err(StorefrontError::Validation(errors)) => {
      assert_eq!(errors.messages("product_id"), ["No product with the given ID was found."]);
    }
    other => panic!("Expected validation error, got {:?}", other),
  }

  assert!(carts::list_cart_items(&store, cart.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_to_unknown_cart_is_not_found() {
  let store = new_store();
  let grocery = create_collection(&store, "Grocery").await;
  let bread = create_product(&store, "Bread", 250, grocery.id).await;

  assert!(matches!(
    carts::add_cart_item(&store, Uuid::new_v4(), add(bread.id, 1)).await,
    Err(StorefrontError::NotFound(_))
  ));
}

#[tokio::test]
async fn test_update_quantity_and_reject_non_positive() {
  let store = new_store();
  let grocery = create_collection(&store, "Grocery").await;
  let bread = create_product(&store, "Bread", 250, grocery.id).await;
  let cart = carts::create_cart(&store).await.unwrap();
  let item = carts::add_cart_item(&store, cart.id, add(bread.id, 2)).await.unwrap();

  let updated = carts::update_cart_item(&store, cart.id, item.id, set_quantity(7))
    .await
    .unwrap();
  assert_eq!(updated.quantity, 7);
  assert_eq!(updated.total_price_cents, 1750);

  for bad in [0, -3] {
    assert!(matches!(
      carts::update_cart_item(&store, cart.id, item.id, set_quantity(bad)).await,
      Err(StorefrontError::Validation(_))
    ));
  }
  let unchanged = carts::get_cart_item(&store, cart.id, item.id).await.unwrap();
  assert_eq!(unchanged.quantity, 7);
}

#[tokio::test]
async fn test_items_are_scoped_to_their_cart() {
  let store = new_store();
  let grocery = create_collection(&store, "Grocery").await;
  let bread = create_product(&store, "Bread", 250, grocery.id).await;
  let mine = carts::create_cart(&store).await.unwrap();
  let other = carts::create_cart(&store).await.unwrap();
  let item = carts::add_cart_item(&store, mine.id, add(bread.id, 1)).await.unwrap();

  assert!(matches!(
    carts::get_cart_item(&store, other.id, item.id).await,
    Err(StorefrontError::NotFound(_))
  ));
  assert!(matches!(
    carts::update_cart_item(&store, other.id, item.id, set_quantity(4)).await,
    Err(StorefrontError::NotFound(_))
  ));
  assert!(matches!(
    carts::delete_cart_item(&store, other.id, item.id).await,
    Err(StorefrontError::NotFound(_))
  ));
  assert_eq!(carts::get_cart_item(&store, mine.id, item.id).await.unwrap().quantity, 1);

  carts::delete_cart_item(&store, mine.id, item.id).await.unwrap();
  assert!(carts::list_cart_items(&store, mine.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_cart_removes_items() {
  let store = new_store();
  let grocery = create_collection(&store, "Grocery").await;
  let bread = create_product(&store, "Bread", 250, grocery.id).await;
  let cart = carts::create_cart(&store).await.unwrap();
  let item = carts::add_cart_item(&store, cart.id, add(bread.id, 1)).await.unwrap();

  carts::delete_cart(&store, cart.id).await.unwrap();

  assert!(matches!(carts::get_cart(&store, cart.id).await, Err(StorefrontError::NotFound(_))));
  assert!(matches!(
    carts::get_cart_item(&store, cart.id, item.id).await,
    Err(StorefrontError::NotFound(_))
  ));
  assert!(matches!(carts::delete_cart(&store, cart.id).await, Err(StorefrontError::NotFound(_))));
}

#[tokio::test]
async fn test_deleting_product_drops_it_from_carts() {
  let store = new_store();
  let grocery = create_collection(&store, "Grocery").await;
  let bread = create_product(&store, "Bread", 250, grocery.id).await;
  let milk = create_product(&store, "Milk", 120, grocery.id).await;
  let cart = carts::create_cart(&store).await.unwrap();
  carts::add_cart_item(&store, cart.id, add(bread.id, 1)).await.unwrap();
  carts::add_cart_item(&store, cart.id, add(milk.id, 1)).await.unwrap();

  products::delete_product(&store, bread.id).await.unwrap();

  let fetched = carts::get_cart(&store, cart.id).await.unwrap();
  assert_eq!(fetched.items.len(), 1);
  assert_eq!(fetched.items[0].product.id, milk.id);
  assert_eq!(fetched.total_price_cents, 120);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_produce_a_single_line() {
  let store = Arc::new(new_store());
  let grocery = create_collection(&store, "Grocery").await;
  let bread = create_product(&store, "Bread", 250, grocery.id).await;
  let cart = carts::create_cart(store.as_ref()).await.unwrap();

  let mut handles = Vec::new();
  for _ in 0..16 {
    let store: Arc<MemoryStore> = Arc::clone(&store);
    let cart_id = cart.id;
    let product_id = bread.id;
    handles.push(tokio::spawn(async move {
      carts::add_cart_item(store.as_ref(), cart_id, add(product_id, 1)).await
    }));
  }
  for handle in handles {
    handle.await.unwrap().unwrap();
  }

  let items = carts::list_cart_items(store.as_ref(), cart.id).await.unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].quantity, 16);
}

#[tokio::test]
async fn test_cart_total_clamps_when_lines_exceed_i64() {
  let store = new_store();
  let grocery = create_collection(&store, "Grocery").await;
  let cart = carts::create_cart(&store).await.unwrap();
  let max = i64::from(i32::MAX);

  for title in ["Gold", "Platinum", "Diamond"] {
    let product = create_product(&store, title, max, grocery.id).await;
    let line = carts::add_cart_item(&store, cart.id, add(product.id, max)).await.unwrap();
    assert_eq!(line.total_price_cents, max * max);
  }

  let fetched = carts::get_cart(&store, cart.id).await.unwrap();
  assert_eq!(fetched.items.len(), 3);
  assert_eq!(fetched.total_price_cents, i64::MAX);
}
