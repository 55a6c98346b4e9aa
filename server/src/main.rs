// storefront_server/src/main.rs

use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use storefront::{CatalogStore, MemoryStore, PgStore};
use storefront_server::config::{AppConfig, StorageBackend};
use storefront_server::errors::{AppError, Result as AppResult};
use storefront_server::state::AppState;
use storefront_server::{telemetry, web};

/// Opens the configured backend, applying migrations first when asked to.
async fn build_store(config: &AppConfig) -> AppResult<Arc<dyn CatalogStore>> {
  match config.storage_backend {
    StorageBackend::Memory => {
      tracing::warn!("Using the in-memory store; data is lost on shutdown.");
      Ok(Arc::new(MemoryStore::new()))
    }
    StorageBackend::Postgres => {
      let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| AppError::Config("DATABASE_URL is not set".to_string()))?;
      let store = PgStore::connect(database_url, config.database_max_connections).await?;
      if config.run_migrations {
        store
          .migrate()
          .await
          .context("Failed to apply database migrations")?;
      }
      Ok(Arc::new(store))
    }
  }
}

fn into_io(err: AppError) -> std::io::Error {
  std::io::Error::other(err.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Load application configuration before logging so LOG_FORMAT can apply.
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      telemetry::init_tracing(storefront_server::LogFormat::Pretty);
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(into_io(e));
    }
  };
  telemetry::init_tracing(app_config.log_format);

  tracing::info!("Starting storefront server...");

  let store = build_store(&app_config).await.map_err(|e| {
    tracing::error!(error = %e, "Failed to initialise the catalog store.");
    into_io(e)
  })?;

  let server_address = app_config.bind_address();
  let app_state = AppState::new(store, app_config);
  tracing::info!(page_size = app_state.config.page_size, "Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    let app_state = app_state.clone();
    App::new()
      .configure(move |cfg| web::configure_app(cfg, app_state))
      .wrap(NormalizePath::new(TrailingSlash::Always))
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
  })
  .bind(&server_address)?
  .run()
  .await
}
