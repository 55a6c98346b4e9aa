// storefront_server/src/web/handlers/cart_item_handlers.rs

use actix_web::{web, HttpResponse};
use storefront::schema::{AddCartItemPayload, UpdateCartItemPayload};
use storefront::services::carts;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::list_cart_items", skip(app_state, path), fields(cart_id = %path))]
pub async fn list_cart_items_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let items = carts::list_cart_items(app_state.store(), path.into_inner()).await?;
  info!("Fetched {} cart items.", items.len());
  Ok(HttpResponse::Ok().json(items))
}

#[instrument(name = "handler::get_cart_item", skip(app_state, path))]
pub async fn get_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(Uuid, i64)>,
) -> Result<HttpResponse, AppError> {
  let (cart_id, id) = path.into_inner();
  let item = carts::get_cart_item(app_state.store(), cart_id, id).await?;
  Ok(HttpResponse::Ok().json(item))
}

/// Adds a product, or increases the quantity of the line already holding it.
#[instrument(name = "handler::add_cart_item", skip(app_state, path, payload), fields(cart_id = %path))]
pub async fn add_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<AddCartItemPayload>,
) -> Result<HttpResponse, AppError> {
  let item = carts::add_cart_item(app_state.store(), path.into_inner(), payload.into_inner()).await?;
  Ok(HttpResponse::Created().json(item))
}

#[instrument(name = "handler::update_cart_item", skip(app_state, path, payload))]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(Uuid, i64)>,
  payload: web::Json<UpdateCartItemPayload>,
) -> Result<HttpResponse, AppError> {
  let (cart_id, id) = path.into_inner();
  let item = carts::update_cart_item(app_state.store(), cart_id, id, payload.into_inner()).await?;
  Ok(HttpResponse::Ok().json(item))
}

#[instrument(name = "handler::delete_cart_item", skip(app_state, path))]
pub async fn delete_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(Uuid, i64)>,
) -> Result<HttpResponse, AppError> {
  let (cart_id, id) = path.into_inner();
  carts::delete_cart_item(app_state.store(), cart_id, id).await?;
  Ok(HttpResponse::NoContent().finish())
}
