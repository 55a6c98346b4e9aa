// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every helper

use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::Arc;
use storefront::MemoryStore;
use storefront_server::config::{AppConfig, StorageBackend};
use storefront_server::state::AppState;
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn app_state(store: Arc<MemoryStore>, page_size: u32) -> AppState {
  setup_tracing();
  let config = AppConfig {
    storage_backend: StorageBackend::Memory,
    page_size,
    ..AppConfig::default()
  };
  AppState::new(store, config)
}

/// Builds the service the way `main` does, over the given in-memory store.
#[macro_export]
macro_rules! init_app {
  ($store:expr) => {
    $crate::init_app!($store, 10)
  };
  ($store:expr, $page_size:expr) => {{
    let state = $crate::common::app_state($store, $page_size);
    actix_web::test::init_service(
      actix_web::App::new()
        .configure(move |cfg| storefront_server::web::configure_app(cfg, state))
        .wrap(actix_web::middleware::NormalizePath::new(
          actix_web::middleware::TrailingSlash::Always,
        )),
    )
    .await
  }};
}

/// Sends a request and returns the status with the decoded JSON body (`Null` when empty).
#[macro_export]
macro_rules! send {
  ($app:expr, $req:expr) => {{
    let resp = actix_web::test::call_service(&$app, $req.to_request()).await;
    let status = resp.status();
    let bytes = actix_web::test::read_body(resp).await;
    let body: serde_json::Value = if bytes.is_empty() {
      serde_json::Value::Null
    } else {
      serde_json::from_slice(&bytes).expect("response body should be JSON")
    };
    (status, body)
  }};
}

pub fn id_of(body: &Value) -> i64 {
  body["id"].as_i64().expect("body should carry a numeric id")
}
