// tests/collection_tests.rs
mod common;
use common::*;
use storefront::schema::CollectionPayload;
use storefront::services::{collections, products};
use storefront::StorefrontError;

#[tokio::test]
async fn test_create_collection_trims_title_and_counts_zero() {
  let store = new_store();
  let created = collections::create_collection(
    &store,
    CollectionPayload {
      title: Some("  Beauty  ".to_string()),
      featured_product_id: None,
    },
  )
  .await
  .unwrap();

  assert_eq!(created.title, "Beauty");
  assert_eq!(created.products_count, 0);
  assert_eq!(created.featured_product_id, None);
}

#[tokio::test]
async fn test_create_collection_rejects_missing_and_blank_title() {
  let store = new_store();

  let missing = collections::create_collection(&store, CollectionPayload::default()).await;
  match missing {
    Err(StorefrontError::Validation(errors)) => {
      assert_eq!(errors.messages("title"), ["This field is required."]);
    }
    other => panic!("Expected validation error, got {:?}", other),
  }

  let blank = collections::create_collection(
    &store,
    CollectionPayload {
      title: Some("   ".to_string()),
      featured_product_id: None,
    },
  )
  .await;
  match blank {
    Err(StorefrontError::Validation(errors)) => assert!(errors.contains("title")),
    other => panic!("Expected validation error, got {:?}", other),
  }

  assert!(collections::list_collections(&store).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_products_count_tracks_assigned_products() {
  let store = new_store();
  let grocery = create_collection(&store, "Grocery").await;
  let toys = create_collection(&store, "Toys").await;
  create_product(&store, "Bread", 250, grocery.id).await;
  create_product(&store, "Milk", 120, grocery.id).await;

  let listed = collections::list_collections(&store).await.unwrap();
  let counts: Vec<(i64, i64)> = listed.iter().map(|c| (c.id, c.products_count)).collect();
  assert_eq!(counts, vec![(grocery.id, 2), (toys.id, 0)]);

  let fetched = collections::get_collection(&store, grocery.id).await.unwrap();
  assert_eq!(fetched.products_count, 2);
}

#[tokio::test]
async fn test_get_unknown_collection_is_not_found() {
  let store = new_store();
  let result = collections::get_collection(&store, 42).await;
  assert!(matches!(result, Err(StorefrontError::NotFound(_))));
}

#[tokio::test]
async fn test_update_collection_sets_featured_product() {
  let store = new_store();
  let grocery = create_collection(&store, "Grocery").await;
  let bread = create_product(&store, "Bread", 250, grocery.id).await;

  let updated = collections::update_collection(
    &store,
    grocery.id,
    CollectionPayload {
      title: Some("Groceries".to_string()),
      featured_product_id: Some(bread.id),
    },
  )
  .await
  .unwrap();
  assert_eq!(updated.title, "Groceries");
  assert_eq!(updated.featured_product_id, Some(bread.id));
  assert_eq!(updated.products_count, 1);
}

#[tokio::test]
async fn test_featured_product_must_exist() {
  let store = new_store();
  let result = collections::create_collection(
    &store,
    CollectionPayload {
      title: Some("Featured".to_string()),
      featured_product_id: Some(999),
    },
  )
  .await;
  match result {
    Err(StorefrontError::Validation(errors)) => assert!(errors.contains("featured_product_id")),
    other => panic!("Expected validation error, got {:?}", other),
  }
}

#[tokio::test]
async fn test_update_unknown_collection_is_not_found_before_validation() {
  let store = new_store();
  let result = collections::update_collection(&store, 7, CollectionPayload::default()).await;
  assert!(matches!(result, Err(StorefrontError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_collection_with_products_is_refused() {
  let store = new_store();
  let grocery = create_collection(&store, "Grocery").await;
  create_product(&store, "Bread", 250, grocery.id).await;

  match collections::delete_collection(&store, grocery.id).await {
    Err(StorefrontError::ReferentialGuard(msg)) => {
      assert_eq!(
        msg,
        "Collection cannot be deleted because it is assigned to existing products."
      );
    }
    other => panic!("Expected referential guard, got {:?}", other),
  }

  // Still there, count unchanged.
  let fetched = collections::get_collection(&store, grocery.id).await.unwrap();
  assert_eq!(fetched.products_count, 1);
}

#[tokio::test]
async fn test_delete_empty_collection_then_not_found() {
  let store = new_store();
  let empty = create_collection(&store, "Empty").await;

  collections::delete_collection(&store, empty.id).await.unwrap();
  assert!(matches!(
    collections::get_collection(&store, empty.id).await,
    Err(StorefrontError::NotFound(_))
  ));
  assert!(matches!(
    collections::delete_collection(&store, empty.id).await,
    Err(StorefrontError::NotFound(_))
  ));
}

#[tokio::test]
async fn test_deleting_featured_product_clears_the_reference() {
  let store = new_store();
  let grocery = create_collection(&store, "Grocery").await;
  let bread = create_product(&store, "Bread", 250, grocery.id).await;
  collections::update_collection(
    &store,
    grocery.id,
    CollectionPayload {
      title: Some("Grocery".to_string()),
      featured_product_id: Some(bread.id),
    },
  )
  .await
  .unwrap();

  products::delete_product(&store, bread.id).await.unwrap();

  let fetched = collections::get_collection(&store, grocery.id).await.unwrap();
  assert_eq!(fetched.featured_product_id, None);
  assert_eq!(fetched.products_count, 0);
}

#[tokio::test]
async fn test_partial_update_keeps_featured_product() {
  let store = new_store();
  let grocery = create_collection(&store, "Grocery").await;
  let bread = create_product(&store, "Bread", 250, grocery.id).await;
  collections::partial_update_collection(
    &store,
    grocery.id,
    CollectionPayload {
      title: None,
      featured_product_id: Some(bread.id),
    },
  )
  .await
  .unwrap();

  let renamed = collections::partial_update_collection(
    &store,
    grocery.id,
    CollectionPayload {
      title: Some("Bakery".to_string()),
      featured_product_id: None,
    },
  )
  .await
  .unwrap();
  assert_eq!(renamed.title, "Bakery");
  assert_eq!(renamed.featured_product_id, Some(bread.id));
  assert_eq!(renamed.products_count, 1);
}
