// storefront_server/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use storefront::services::carts;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// Carts are created empty; the request body, if any, is ignored.
#[instrument(name = "handler::create_cart", skip(app_state))]
pub async fn create_cart_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let cart = carts::create_cart(app_state.store()).await?;
  info!(cart_id = %cart.id, "New cart issued.");
  Ok(HttpResponse::Created().json(cart))
}

#[instrument(name = "handler::get_cart", skip(app_state, path), fields(cart_id = %path))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let cart = carts::get_cart(app_state.store(), path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(name = "handler::delete_cart", skip(app_state, path), fields(cart_id = %path))]
pub async fn delete_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  carts::delete_cart(app_state.store(), path.into_inner()).await?;
  Ok(HttpResponse::NoContent().finish())
}
