// storefront_server/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use storefront::schema::ProductPayload;
use storefront::services::products;
use storefront::ProductListParams;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::pagination::Paginated;

#[instrument(name = "handler::list_products", skip(req, app_state, query_params))]
pub async fn list_products_handler(
  req: HttpRequest,
  app_state: web::Data<AppState>,
  query_params: web::Query<ProductListParams>,
) -> Result<HttpResponse, AppError> {
  let query = query_params.into_inner().into_query(app_state.config.page_size)?;
  let page = products::list_products(app_state.store(), &query).await?;
  info!(
    page = query.page.number,
    count = page.total,
    "Fetched {} products.",
    page.items.len()
  );
  Ok(HttpResponse::Ok().json(Paginated::new(&req, query.page, page)))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product = products::get_product(app_state.store(), path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::create_product", skip(app_state, payload))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<ProductPayload>,
) -> Result<HttpResponse, AppError> {
  let product = products::create_product(app_state.store(), payload.into_inner()).await?;
  Ok(HttpResponse::Created().json(product))
}

#[instrument(name = "handler::update_product", skip(app_state, path, payload), fields(product_id = %path))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  payload: web::Json<ProductPayload>,
) -> Result<HttpResponse, AppError> {
  let product = products::update_product(app_state.store(), path.into_inner(), payload.into_inner()).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::partial_update_product", skip(app_state, path, payload), fields(product_id = %path))]
pub async fn partial_update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  payload: web::Json<ProductPayload>,
) -> Result<HttpResponse, AppError> {
  let product =
    products::partial_update_product(app_state.store(), path.into_inner(), payload.into_inner()).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::delete_product", skip(app_state, path), fields(product_id = %path))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  products::delete_product(app_state.store(), path.into_inner()).await?;
  Ok(HttpResponse::NoContent().finish())
}
