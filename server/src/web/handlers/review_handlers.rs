// storefront_server/src/web/handlers/review_handlers.rs

//! Reviews nested under `/products/{product_id}/reviews/`. The product id always comes
//! from the path.

use actix_web::{web, HttpResponse};
use storefront::schema::ReviewPayload;
use storefront::services::reviews;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::list_reviews", skip(app_state, path), fields(product_id = %path))]
pub async fn list_reviews_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let reviews = reviews::list_reviews(app_state.store(), path.into_inner()).await?;
  info!("Fetched {} reviews.", reviews.len());
  Ok(HttpResponse::Ok().json(reviews))
}

#[instrument(name = "handler::get_review", skip(app_state, path))]
pub async fn get_review_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
  let (product_id, id) = path.into_inner();
  let review = reviews::get_review(app_state.store(), product_id, id).await?;
  Ok(HttpResponse::Ok().json(review))
}

#[instrument(name = "handler::create_review", skip(app_state, path, payload), fields(product_id = %path))]
pub async fn create_review_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  payload: web::Json<ReviewPayload>,
) -> Result<HttpResponse, AppError> {
  let review = reviews::create_review(app_state.store(), path.into_inner(), payload.into_inner()).await?;
  Ok(HttpResponse::Created().json(review))
}

#[instrument(name = "handler::update_review", skip(app_state, path, payload))]
pub async fn update_review_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(i64, i64)>,
  payload: web::Json<ReviewPayload>,
) -> Result<HttpResponse, AppError> {
  let (product_id, id) = path.into_inner();
  let review = reviews::update_review(app_state.store(), product_id, id, payload.into_inner()).await?;
  Ok(HttpResponse::Ok().json(review))
}

#[instrument(name = "handler::partial_update_review", skip(app_state, path, payload))]
pub async fn partial_update_review_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(i64, i64)>,
  payload: web::Json<ReviewPayload>,
) -> Result<HttpResponse, AppError> {
  let (product_id, id) = path.into_inner();
  let review = reviews::partial_update_review(app_state.store(), product_id, id, payload.into_inner()).await?;
  Ok(HttpResponse::Ok().json(review))
}

#[instrument(name = "handler::delete_review", skip(app_state, path))]
pub async fn delete_review_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
  let (product_id, id) = path.into_inner();
  reviews::delete_review(app_state.store(), product_id, id).await?;
  Ok(HttpResponse::NoContent().finish())
}
