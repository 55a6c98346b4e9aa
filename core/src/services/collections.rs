// storefront/src/services/collections.rs

use tracing::{info, instrument, warn};

use crate::error::{StorefrontError, StorefrontResult, COLLECTION_HAS_PRODUCTS};
use crate::models::Collection;
use crate::schema::{CollectionDraft, CollectionPayload};
use crate::store::CatalogStore;

async fn check_featured_product(store: &dyn CatalogStore, draft: &CollectionDraft) -> StorefrontResult<()> {
  if let Some(product_id) = draft.featured_product_id {
    if store.get_product(product_id).await?.is_none() {
      return Err(StorefrontError::invalid_reference("featured_product_id", product_id));
    }
  }
  Ok(())
}

#[instrument(name = "service::list_collections", skip(store), err(Display))]
pub async fn list_collections(store: &dyn CatalogStore) -> StorefrontResult<Vec<Collection>> {
  store.list_collections().await
}

#[instrument(name = "service::get_collection", skip(store), err(Display))]
pub async fn get_collection(store: &dyn CatalogStore, id: i64) -> StorefrontResult<Collection> {
  store
    .get_collection(id)
    .await?
    .ok_or_else(|| StorefrontError::not_found("Collection", id))
}

#[instrument(name = "service::create_collection", skip(store, payload), err(Display))]
pub async fn create_collection(store: &dyn CatalogStore, payload: CollectionPayload) -> StorefrontResult<Collection> {
  let draft = payload.validate()?;
  check_featured_product(store, &draft).await?;
  let collection = store.insert_collection(&draft).await?;
  info!(collection_id = collection.id, "Collection created.");
  Ok(collection)
}

#[instrument(name = "service::update_collection", skip(store, payload), err(Display))]
pub async fn update_collection(
  store: &dyn CatalogStore,
  id: i64,
  payload: CollectionPayload,
) -> StorefrontResult<Collection> {
  get_collection(store, id).await?;
  save_collection(store, id, payload).await
}

/// Updates only the fields present in `payload`.
#[instrument(name = "service::partial_update_collection", skip(store, payload), err(Display))]
pub async fn partial_update_collection(
  store: &dyn CatalogStore,
  id: i64,
  payload: CollectionPayload,
) -> StorefrontResult<Collection> {
  let existing = get_collection(store, id).await?;
  save_collection(store, id, payload.merged_onto(&existing)).await
}

async fn save_collection(store: &dyn CatalogStore, id: i64, payload: CollectionPayload) -> StorefrontResult<Collection> {
  let draft = payload.validate()?;
  check_featured_product(store, &draft).await?;
  let collection = store
    .update_collection(id, &draft)
    .await?
    .ok_or_else(|| StorefrontError::not_found("Collection", id))?;
  info!(collection_id = id, "Collection updated.");
  Ok(collection)
}

/// Deletes a collection unless products are still assigned to it.
#[instrument(name = "service::delete_collection", skip(store), err(Display))]
pub async fn delete_collection(store: &dyn CatalogStore, id: i64) -> StorefrontResult<()> {
  get_collection(store, id).await?;

  let products_count = store.count_products_in_collection(id).await?;
  if products_count > 0 {
    warn!(collection_id = id, products_count, "Refusing to delete collection with assigned products.");
    return Err(StorefrontError::ReferentialGuard(COLLECTION_HAS_PRODUCTS.to_string()));
  }

  if !store.delete_collection(id).await? {
    return Err(StorefrontError::not_found("Collection", id));
  }
  info!(collection_id = id, "Collection deleted.");
  Ok(())
}
