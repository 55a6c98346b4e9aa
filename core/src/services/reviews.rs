// storefront/src/services/reviews.rs

use tracing::{info, instrument};

use crate::error::{StorefrontError, StorefrontResult};
use crate::models::Review;
use crate::schema::ReviewPayload;
use crate::store::CatalogStore;

async fn require_product(store: &dyn CatalogStore, product_id: i64) -> StorefrontResult<()> {
  match store.get_product(product_id).await? {
    Some(_) => Ok(()),
    None => Err(StorefrontError::not_found("Product", product_id)),
  }
}

fn review_not_found(product_id: i64, id: i64) -> StorefrontError {
  StorefrontError::NotFound(format!("Review with ID {} not found for product {}.", id, product_id))
}

#[instrument(name = "service::list_reviews", skip(store), err(Display))]
pub async fn list_reviews(store: &dyn CatalogStore, product_id: i64) -> StorefrontResult<Vec<Review>> {
  require_product(store, product_id).await?;
  store.list_reviews(product_id).await
}

#[instrument(name = "service::get_review", skip(store), err(Display))]
pub async fn get_review(store: &dyn CatalogStore, product_id: i64, id: i64) -> StorefrontResult<Review> {
  require_product(store, product_id).await?;
  store
    .get_review(product_id, id)
    .await?
    .ok_or_else(|| review_not_found(product_id, id))
}

/// Creates a review under `product_id`, the product taken from the path only.
#[instrument(name = "service::create_review", skip(store, payload), err(Display))]
pub async fn create_review(store: &dyn CatalogStore, product_id: i64, payload: ReviewPayload) -> StorefrontResult<Review> {
  require_product(store, product_id).await?;
  let draft = payload.validate()?;
  let review = store.insert_review(product_id, &draft).await?;
  info!(product_id, review_id = review.id, "Review created.");
  Ok(review)
}

#[instrument(name = "service::update_review", skip(store, payload), err(Display))]
pub async fn update_review(
  store: &dyn CatalogStore,
  product_id: i64,
  id: i64,
  payload: ReviewPayload,
) -> StorefrontResult<Review> {
  get_review(store, product_id, id).await?;
  save_review(store, product_id, id, payload).await
}

/// Updates only the fields present in `payload`.
#[instrument(name = "service::partial_update_review", skip(store, payload), err(Display))]
pub async fn partial_update_review(
  store: &dyn CatalogStore,
  product_id: i64,
  id: i64,
  payload: ReviewPayload,
) -> StorefrontResult<Review> {
  let existing = get_review(store, product_id, id).await?;
  save_review(store, product_id, id, payload.merged_onto(&existing)).await
}

async fn save_review(store: &dyn CatalogStore, product_id: i64, id: i64, payload: ReviewPayload) -> StorefrontResult<Review> {
  let draft = payload.validate()?;
  let review = store
    .update_review(product_id, id, &draft)
    .await?
    .ok_or_else(|| review_not_found(product_id, id))?;
  info!(product_id, review_id = id, "Review updated.");
  Ok(review)
}

#[instrument(name = "service::delete_review", skip(store), err(Display))]
pub async fn delete_review(store: &dyn CatalogStore, product_id: i64, id: i64) -> StorefrontResult<()> {
  require_product(store, product_id).await?;
  if !store.delete_review(product_id, id).await? {
    return Err(review_not_found(product_id, id));
  }
  info!(product_id, review_id = id, "Review deleted.");
  Ok(())
}
