// storefront_server/src/web/routes.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::handlers::{
  cart_handlers, cart_item_handlers, collection_handlers, product_handlers, review_handlers,
};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Fallback for a known resource hit with a method it does not support.
async fn method_not_allowed_handler(req: HttpRequest) -> HttpResponse {
  HttpResponse::MethodNotAllowed().json(json!({ "error": format!("Method \"{}\" not allowed.", req.method()) }))
}

async fn not_found_handler() -> HttpResponse {
  HttpResponse::NotFound().json(json!({ "error": "Not found." }))
}

/// Registers shared state, extractor error handlers and every route.
///
/// Paths are declared with a trailing slash; the app is expected to be wrapped in
/// `NormalizePath::new(TrailingSlash::Always)` so both spellings resolve.
pub fn configure_app(cfg: &mut web::ServiceConfig, app_state: AppState) {
  cfg
    .app_data(web::Data::new(app_state))
    .app_data(web::JsonConfig::default().error_handler(|err, _req| AppError::Payload(err.to_string()).into()))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| AppError::Payload(err.to_string()).into()))
    .app_data(web::PathConfig::default().error_handler(|err, _req| AppError::invalid_path(err).into()));
  configure_app_routes(cfg);
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1") // Base path for API version 1
      .route("/health/", web::get().to(health_check_handler))
      // --- Collections ---
      .service(
        web::resource("/collections/")
          .route(web::get().to(collection_handlers::list_collections_handler))
          .route(web::post().to(collection_handlers::create_collection_handler))
          .default_service(web::to(method_not_allowed_handler)),
      )
      .service(
        web::resource("/collections/{collection_id}/")
          .route(web::get().to(collection_handlers::get_collection_handler))
          .route(web::put().to(collection_handlers::update_collection_handler))
          .route(web::patch().to(collection_handlers::partial_update_collection_handler))
          .route(web::delete().to(collection_handlers::delete_collection_handler))
          .default_service(web::to(method_not_allowed_handler)),
      )
      // --- Products ---
      .service(
        web::resource("/products/")
          .route(web::get().to(product_handlers::list_products_handler))
          .route(web::post().to(product_handlers::create_product_handler))
          .default_service(web::to(method_not_allowed_handler)),
      )
      .service(
        web::resource("/products/{product_id}/")
          .route(web::get().to(product_handlers::get_product_handler))
          .route(web::put().to(product_handlers::update_product_handler))
          .route(web::patch().to(product_handlers::partial_update_product_handler))
          .route(web::delete().to(product_handlers::delete_product_handler))
          .default_service(web::to(method_not_allowed_handler)),
      )
      // --- Reviews, nested under their product ---
      .service(
        web::resource("/products/{product_id}/reviews/")
          .route(web::get().to(review_handlers::list_reviews_handler))
          .route(web::post().to(review_handlers::create_review_handler))
          .default_service(web::to(method_not_allowed_handler)),
      )
      .service(
        web::resource("/products/{product_id}/reviews/{review_id}/")
          .route(web::get().to(review_handlers::get_review_handler))
          .route(web::put().to(review_handlers::update_review_handler))
          .route(web::patch().to(review_handlers::partial_update_review_handler))
          .route(web::delete().to(review_handlers::delete_review_handler))
          .default_service(web::to(method_not_allowed_handler)),
      )
      // --- Carts: no listing, no replacement ---
      .service(
        web::resource("/carts/")
          .route(web::post().to(cart_handlers::create_cart_handler))
          .default_service(web::to(method_not_allowed_handler)),
      )
      .service(
        web::resource("/carts/{cart_id}/")
          .route(web::get().to(cart_handlers::get_cart_handler))
          .route(web::delete().to(cart_handlers::delete_cart_handler))
          .default_service(web::to(method_not_allowed_handler)),
      )
      // --- Cart items, nested under their cart; quantity changes go through PATCH only ---
      .service(
        web::resource("/carts/{cart_id}/items/")
          .route(web::get().to(cart_item_handlers::list_cart_items_handler))
          .route(web::post().to(cart_item_handlers::add_cart_item_handler))
          .default_service(web::to(method_not_allowed_handler)),
      )
      .service(
        web::resource("/carts/{cart_id}/items/{item_id}/")
          .route(web::get().to(cart_item_handlers::get_cart_item_handler))
          .route(web::patch().to(cart_item_handlers::update_cart_item_handler))
          .route(web::delete().to(cart_item_handlers::delete_cart_item_handler))
          .default_service(web::to(method_not_allowed_handler)),
      )
      .default_service(web::to(not_found_handler)),
  );
}
