// storefront_server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

/// Which `CatalogStore` implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
  Postgres,
  Memory,
}

impl FromStr for StorageBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "postgres" => Ok(StorageBackend::Postgres),
      "memory" => Ok(StorageBackend::Memory),
      other => Err(AppError::Config(format!(
        "Invalid STORAGE_BACKEND '{}': expected 'postgres' or 'memory'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

impl FromStr for LogFormat {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "pretty" => Ok(LogFormat::Pretty),
      "json" => Ok(LogFormat::Json),
      other => Err(AppError::Config(format!(
        "Invalid LOG_FORMAT '{}': expected 'pretty' or 'json'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub storage_backend: StorageBackend,
  /// Only required for the Postgres backend.
  pub database_url: Option<String>,
  pub database_max_connections: u32,
  pub run_migrations: bool,
  pub page_size: u32,
  pub log_format: LogFormat,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      storage_backend: StorageBackend::Postgres,
      database_url: None,
      database_max_connections: 5,
      run_migrations: true,
      page_size: storefront::query::DEFAULT_PAGE_SIZE,
      log_format: LogFormat::Pretty,
    }
  }
}

fn parse_var<T: FromStr>(name: &str, raw: String) -> Result<T>
where
  T::Err: std::fmt::Display,
{
  raw
    .trim()
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e)))
}

impl AppConfig {
  /// Reads the process environment (after loading `.env` if present).
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source. Unset variables take their defaults.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let defaults = Self::default();

    let server_host = lookup("SERVER_HOST").unwrap_or(defaults.server_host);
    let server_port = match lookup("SERVER_PORT") {
      Some(raw) => parse_var("SERVER_PORT", raw)?,
      None => defaults.server_port,
    };
    let storage_backend = match lookup("STORAGE_BACKEND") {
      Some(raw) => raw.parse::<StorageBackend>()?,
      None => defaults.storage_backend,
    };
    let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
    if storage_backend == StorageBackend::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' (required when STORAGE_BACKEND=postgres)".to_string(),
      ));
    }
    let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
      Some(raw) => parse_var("DATABASE_MAX_CONNECTIONS", raw)?,
      None => defaults.database_max_connections,
    };
    let run_migrations = match lookup("RUN_MIGRATIONS") {
      Some(raw) => parse_var("RUN_MIGRATIONS", raw)?,
      None => defaults.run_migrations,
    };
    let page_size: u32 = match lookup("PAGE_SIZE") {
      Some(raw) => parse_var("PAGE_SIZE", raw)?,
      None => defaults.page_size,
    };
    if page_size == 0 {
      return Err(AppError::Config("Invalid PAGE_SIZE: must be at least 1".to_string()));
    }
    let log_format = match lookup("LOG_FORMAT") {
      Some(raw) => raw.parse::<LogFormat>()?,
      None => defaults.log_format,
    };

    // Avoid logging DATABASE_URL, it usually carries credentials.
    tracing::debug!(
      server_host = %server_host,
      server_port,
      ?storage_backend,
      page_size,
      "Application configuration loaded."
    );

    Ok(Self {
      server_host,
      server_port,
      storage_backend,
      database_url,
      database_max_connections,
      run_migrations,
      page_size,
      log_format,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
