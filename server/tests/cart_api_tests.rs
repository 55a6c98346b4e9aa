// tests/cart_api_tests.rs
mod common;
use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use common::*;
use serde_json::{json, Value};
use std::sync::Arc;
use storefront::schema::{CollectionPayload, ProductPayload};
use storefront::services::{collections, products};
use storefront::MemoryStore;

/// A store holding one collection with the given `(title, unit_price_cents)` products.
async fn seeded_store(items: &[(&str, i64)]) -> (Arc<MemoryStore>, Vec<i64>) {
  let store = Arc::new(MemoryStore::new());
  let collection = collections::create_collection(
    store.as_ref(),
    CollectionPayload {
      title: Some("Grocery".to_string()),
      featured_product_id: None,
    },
  )
  .await
  .unwrap();

  let mut ids = Vec::new();
  for (title, price) in items {
    let product = products::create_product(
      store.as_ref(),
      ProductPayload {
        title: Some(title.to_string()),
        unit_price_cents: Some(*price),
        collection_id: Some(collection.id),
        ..Default::default()
      },
    )
    .await
    .unwrap();
    ids.push(product.id);
  }
  (store, ids)
}

fn cart_id_of(body: &Value) -> String {
  body["id"].as_str().expect("cart id should be a string").to_string()
}

#[actix_web::test]
async fn test_fresh_carts_are_empty_and_distinct() {
  let app = init_app!(Arc::new(MemoryStore::new()));

  let (status, first) = send!(app, TestRequest::post().uri("/api/v1/carts/"));
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(first["items"], json!([]));
  assert_eq!(first["total_price_cents"], 0);

  let (_, second) = send!(app, TestRequest::post().uri("/api/v1/carts/"));
  assert_ne!(cart_id_of(&first), cart_id_of(&second));

  let (status, fetched) = send!(app, TestRequest::get().uri(&format!("/api/v1/carts/{}/", cart_id_of(&first))));
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched["id"], first["id"]);
}

#[actix_web::test]
async fn test_cart_listing_and_replacement_are_not_allowed() {
  let app = init_app!(Arc::new(MemoryStore::new()));
  let (status, body) = send!(app, TestRequest::get().uri("/api/v1/carts/"));
  assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
  assert!(body["error"].is_string());

  let (_, cart) = send!(app, TestRequest::post().uri("/api/v1/carts/"));
  let (status, _) = send!(
    app,
    TestRequest::put()
      .uri(&format!("/api/v1/carts/{}/", cart_id_of(&cart)))
      .set_json(json!({}))
  );
  assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[actix_web::test]
async fn test_unknown_or_malformed_cart_is_not_found() {
  let app = init_app!(Arc::new(MemoryStore::new()));
  let (status, _) = send!(
    app,
    TestRequest::get().uri("/api/v1/carts/6f1c1d2e-4b7a-4c1e-9a55-0d7c3b1f2a90/")
  );
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, body) = send!(app, TestRequest::get().uri("/api/v1/carts/not-a-uuid/items/"));
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].is_string());
}

#[actix_web::test]
async fn test_adding_twice_merges_and_cart_totals_lines() {
  let (store, ids) = seeded_store(&[("Bread", 250), ("Milk", 199)]).await;
  let app = init_app!(store);
  let (_, cart) = send!(app, TestRequest::post().uri("/api/v1/carts/"));
  let items_uri = format!("/api/v1/carts/{}/items/", cart_id_of(&cart));

  let (status, first) = send!(
    app,
    TestRequest::post().uri(&items_uri).set_json(json!({"product_id": ids[0], "quantity": 2}))
  );
  assert_eq!(status, StatusCode::CREATED);
  let (status, merged) = send!(
    app,
    TestRequest::post().uri(&items_uri).set_json(json!({"product_id": ids[0], "quantity": 3}))
  );
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(merged["id"], first["id"]);
  assert_eq!(merged["quantity"], 5);
  assert_eq!(
    merged["product"],
    json!({"id": ids[0], "title": "Bread", "unit_price_cents": 250})
  );
  assert_eq!(merged["total_price_cents"], 1250);

  send!(
    app,
    TestRequest::post().uri(&items_uri).set_json(json!({"product_id": ids[1], "quantity": 1}))
  );

  let (status, fetched) = send!(app, TestRequest::get().uri(&format!("/api/v1/carts/{}/", cart_id_of(&cart))));
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched["items"].as_array().map(Vec::len), Some(2));
  assert_eq!(fetched["total_price_cents"], 1449);
}

#[actix_web::test]
async fn test_add_rejects_unknown_product_and_bad_quantity() {
  let (store, ids) = seeded_store(&[("Bread", 250)]).await;
  let app = init_app!(store);
  let (_, cart) = send!(app, TestRequest::post().uri("/api/v1/carts/"));
  let items_uri = format!("/api/v1/carts/{}/items/", cart_id_of(&cart));

  let (status, body) = send!(
    app,
    TestRequest::post().uri(&items_uri).set_json(json!({"product_id": 4040, "quantity": 1}))
  );
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body, json!({"product_id": ["No product with the given ID was found."]}));

  let (status, body) = send!(
    app,
    TestRequest::post().uri(&items_uri).set_json(json!({"product_id": ids[0], "quantity": 0}))
  );
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["quantity"].is_array());

  let (_, items) = send!(app, TestRequest::get().uri(&items_uri));
  assert_eq!(items, json!([]));
}

#[actix_web::test]
async fn test_patch_updates_quantity_and_put_is_not_allowed() {
  let (store, ids) = seeded_store(&[("Bread", 250)]).await;
  let app = init_app!(store);
  let (_, cart) = send!(app, TestRequest::post().uri("/api/v1/carts/"));
  let items_uri = format!("/api/v1/carts/{}/items/", cart_id_of(&cart));
  let (_, item) = send!(
    app,
    TestRequest::post().uri(&items_uri).set_json(json!({"product_id": ids[0], "quantity": 2}))
  );
  let item_uri = format!("{}{}/", items_uri, id_of(&item));

  let (status, updated) = send!(app, TestRequest::patch().uri(&item_uri).set_json(json!({"quantity": 4})));
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["quantity"], 4);
  assert_eq!(updated["total_price_cents"], 1000);

  let (status, body) = send!(app, TestRequest::patch().uri(&item_uri).set_json(json!({"quantity": 0})));
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["quantity"].is_array());

  let (status, _) = send!(app, TestRequest::put().uri(&item_uri).set_json(json!({"quantity": 9})));
  assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

  let (_, unchanged) = send!(app, TestRequest::get().uri(&item_uri));
  assert_eq!(unchanged["quantity"], 4);
}

#[actix_web::test]
async fn test_items_from_another_cart_are_not_found() {
  let (store, ids) = seeded_store(&[("Bread", 250)]).await;
  let app = init_app!(store);
  let (_, mine) = send!(app, TestRequest::post().uri("/api/v1/carts/"));
  let (_, other) = send!(app, TestRequest::post().uri("/api/v1/carts/"));
  let (_, item) = send!(
    app,
    TestRequest::post()
      .uri(&format!("/api/v1/carts/{}/items/", cart_id_of(&mine)))
      .set_json(json!({"product_id": ids[0], "quantity": 1}))
  );

  let foreign_uri = format!("/api/v1/carts/{}/items/{}/", cart_id_of(&other), id_of(&item));
  let (status, _) = send!(app, TestRequest::get().uri(&foreign_uri));
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _) = send!(app, TestRequest::delete().uri(&foreign_uri));
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_deleting_cart_removes_its_items() {
  let (store, ids) = seeded_store(&[("Bread", 250)]).await;
  let app = init_app!(store);
  let (_, cart) = send!(app, TestRequest::post().uri("/api/v1/carts/"));
  let cart_uri = format!("/api/v1/carts/{}/", cart_id_of(&cart));
  let (_, item) = send!(
    app,
    TestRequest::post()
      .uri(&format!("{}items/", cart_uri))
      .set_json(json!({"product_id": ids[0], "quantity": 1}))
  );

  let (status, _) = send!(app, TestRequest::delete().uri(&cart_uri));
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, _) = send!(app, TestRequest::get().uri(&cart_uri));
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _) = send!(app, TestRequest::get().uri(&format!("{}items/{}/", cart_uri, id_of(&item))));
  assert_eq!(status, StatusCode::NOT_FOUND);
}
