// storefront_server/src/lib.rs

//! HTTP surface for the storefront: configuration, error mapping, shared state and
//! the actix-web routes under `/api/v1`. The binary in `main.rs` wires these together.

pub mod config;
pub mod errors;
pub mod state;
pub mod telemetry;
pub mod web;

pub use crate::config::{AppConfig, LogFormat, StorageBackend};
pub use crate::errors::{AppError, Result};
pub use crate::state::AppState;
