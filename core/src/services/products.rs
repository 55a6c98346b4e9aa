// storefront/src/services/products.rs

use tracing::{info, instrument, warn};

use crate::error::{StorefrontError, StorefrontResult, PRODUCT_HAS_ORDERS};
use crate::query::{PageSlice, ProductQuery};
use crate::schema::{ProductDraft, ProductPayload, ProductRepr};
use crate::store::CatalogStore;

async fn check_collection(store: &dyn CatalogStore, draft: &ProductDraft) -> StorefrontResult<()> {
  match store.get_collection(draft.collection_id).await? {
    Some(_) => Ok(()),
    None => Err(StorefrontError::invalid_reference("collection_id", draft.collection_id)),
  }
}

/// One page of products. Asking for a page past the end (other than the first) is not found.
#[instrument(name = "service::list_products", skip(store), err(Display))]
pub async fn list_products(store: &dyn CatalogStore, query: &ProductQuery) -> StorefrontResult<PageSlice<ProductRepr>> {
  let page = store.list_products(query).await?;
  if query.page.number > 1 && query.page.offset() >= page.total {
    warn!(page = query.page.number, total = page.total, "Requested product page is out of range.");
    return Err(StorefrontError::NotFound("Invalid page.".to_string()));
  }
  info!(total = page.total, returned = page.items.len(), "Products listed.");
  Ok(page.map(ProductRepr::from))
}

#[instrument(name = "service::get_product", skip(store), err(Display))]
pub async fn get_product(store: &dyn CatalogStore, id: i64) -> StorefrontResult<ProductRepr> {
  store
    .get_product(id)
    .await?
    .map(ProductRepr::from)
    .ok_or_else(|| StorefrontError::not_found("Product", id))
}

#[instrument(name = "service::create_product", skip(store, payload), err(Display))]
pub async fn create_product(store: &dyn CatalogStore, payload: ProductPayload) -> StorefrontResult<ProductRepr> {
  let draft = payload.validate()?;
  check_collection(store, &draft).await?;
  let product = store.insert_product(&draft).await?;
  info!(product_id = product.id, collection_id = product.collection_id, "Product created.");
  Ok(product.into())
}

async fn save_product(store: &dyn CatalogStore, id: i64, payload: ProductPayload) -> StorefrontResult<ProductRepr> {
  let draft = payload.validate()?;
  check_collection(store, &draft).await?;
  let product = store
    .update_product(id, &draft)
    .await?
    .ok_or_else(|| StorefrontError::not_found("Product", id))?;
  info!(product_id = id, "Product updated.");
  Ok(product.into())
}

#[instrument(name = "service::update_product", skip(store, payload), err(Display))]
pub async fn update_product(store: &dyn CatalogStore, id: i64, payload: ProductPayload) -> StorefrontResult<ProductRepr> {
  get_product(store, id).await?;
  save_product(store, id, payload).await
}

/// Updates only the fields present in `payload`.
#[instrument(name = "service::partial_update_product", skip(store, payload), err(Display))]
pub async fn partial_update_product(
  store: &dyn CatalogStore,
  id: i64,
  payload: ProductPayload,
) -> StorefrontResult<ProductRepr> {
  let existing = store
    .get_product(id)
    .await?
    .ok_or_else(|| StorefrontError::not_found("Product", id))?;
  save_product(store, id, payload.merged_onto(&existing)).await
}

/// Deletes a product unless an order item references it.
#[instrument(name = "service::delete_product", skip(store), err(Display))]
pub async fn delete_product(store: &dyn CatalogStore, id: i64) -> StorefrontResult<()> {
  get_product(store, id).await?;

  let order_items = store.count_order_items_for_product(id).await?;
  if order_items > 0 {
    warn!(product_id = id, order_items, "Refusing to delete product referenced by orders.");
    return Err(StorefrontError::ReferentialGuard(PRODUCT_HAS_ORDERS.to_string()));
  }

  if !store.delete_product(id).await? {
    return Err(StorefrontError::not_found("Product", id));
  }
  info!(product_id = id, "Product deleted.");
  Ok(())
}
