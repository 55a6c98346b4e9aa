// storefront_server/src/web/handlers/collection_handlers.rs

use actix_web::{web, HttpResponse};
use storefront::schema::CollectionPayload;
use storefront::services::collections;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::list_collections", skip(app_state))]
pub async fn list_collections_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let collections = collections::list_collections(app_state.store()).await?;
  info!("Fetched {} collections.", collections.len());
  Ok(HttpResponse::Ok().json(collections))
}

#[instrument(name = "handler::get_collection", skip(app_state, path), fields(collection_id = %path))]
pub async fn get_collection_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let collection = collections::get_collection(app_state.store(), path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(collection))
}

#[instrument(name = "handler::create_collection", skip(app_state, payload))]
pub async fn create_collection_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CollectionPayload>,
) -> Result<HttpResponse, AppError> {
  let collection = collections::create_collection(app_state.store(), payload.into_inner()).await?;
  Ok(HttpResponse::Created().json(collection))
}

#[instrument(name = "handler::update_collection", skip(app_state, path, payload), fields(collection_id = %path))]
pub async fn update_collection_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  payload: web::Json<CollectionPayload>,
) -> Result<HttpResponse, AppError> {
  let collection =
    collections::update_collection(app_state.store(), path.into_inner(), payload.into_inner()).await?;
  Ok(HttpResponse::Ok().json(collection))
}

#[instrument(name = "handler::partial_update_collection", skip(app_state, path, payload), fields(collection_id = %path))]
pub async fn partial_update_collection_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  payload: web::Json<CollectionPayload>,
) -> Result<HttpResponse, AppError> {
  let collection =
    collections::partial_update_collection(app_state.store(), path.into_inner(), payload.into_inner()).await?;
  Ok(HttpResponse::Ok().json(collection))
}

#[instrument(name = "handler::delete_collection", skip(app_state, path), fields(collection_id = %path))]
pub async fn delete_collection_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  collections::delete_collection(app_state.store(), path.into_inner()).await?;
  Ok(HttpResponse::NoContent().finish())
}
