// storefront_server/src/state.rs
use crate::config::AppConfig;
use std::sync::Arc;
use storefront::CatalogStore;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn CatalogStore>,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  pub fn new(store: Arc<dyn CatalogStore>, config: AppConfig) -> Self {
    Self {
      store,
      config: Arc::new(config),
    }
  }

  /// The store as the `&dyn` the service functions take.
  pub fn store(&self) -> &dyn CatalogStore {
    self.store.as_ref()
  }
}
