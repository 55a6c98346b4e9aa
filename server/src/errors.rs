// storefront_server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use storefront::StorefrontError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Storefront(#[from] StorefrontError),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  /// Body or query string that could not be decoded at all.
  #[error("Malformed Request: {0}")]
  Payload(String),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

// Lets startup code use `anyhow::Context` and still return `AppError`.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(other) => AppError::Internal(format!("{:#}", other)),
    }
  }
}

impl AppError {
  /// Path parameters that do not parse are reported as missing resources.
  pub fn invalid_path(detail: impl std::fmt::Display) -> Self {
    AppError::Storefront(StorefrontError::NotFound(format!("Not found: {}", detail)))
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Storefront(StorefrontError::NotFound(_)) => StatusCode::NOT_FOUND,
      AppError::Storefront(StorefrontError::Validation(_)) => StatusCode::BAD_REQUEST,
      AppError::Storefront(StorefrontError::ReferentialGuard(_)) => StatusCode::METHOD_NOT_ALLOWED,
      AppError::Payload(_) => StatusCode::BAD_REQUEST,
      AppError::Storefront(StorefrontError::Storage(_))
      | AppError::Config(_)
      | AppError::Sqlx(_)
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Rejecting request");
    }

    let mut builder = HttpResponse::build(status);
    match self {
      AppError::Storefront(StorefrontError::Validation(errors)) => builder.json(errors),
      AppError::Storefront(StorefrontError::NotFound(m))
      | AppError::Storefront(StorefrontError::ReferentialGuard(m))
      | AppError::Payload(m) => builder.json(json!({"error": m})),
      AppError::Storefront(StorefrontError::Storage(_)) | AppError::Sqlx(_) => {
        builder.json(json!({"error": "Database operation failed"}))
      }
      AppError::Config(_) => builder.json(json!({"error": "Configuration issue"})),
      AppError::Internal(_) => builder.json(json!({"error": "An internal error occurred"})),
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
