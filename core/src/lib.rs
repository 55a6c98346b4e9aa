// src/lib.rs

//! Storefront: the catalog and cart domain behind the storefront REST API.
//!
//! The crate is organised leaf-first:
//!  - `models`: rows as they are persisted (collections, products, reviews, carts, cart items).
//!  - `schema`: request payloads with per-field validation, and response representations
//!    carrying computed fields (product counts, taxed prices, line totals).
//!  - `query`: declarative product list parameters (filter, search, ordering, page).
//!  - `store`: the `CatalogStore` trait with a Postgres backend and an in-memory backend.
//!  - `services`: the operations exposed over HTTP, including the delete guard rules
//!    and the cart-item add workflow.

pub mod error;
pub mod models;
pub mod query;
pub mod schema;
pub mod services;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::error::{StorefrontError, StorefrontResult, ValidationErrors};
pub use crate::query::{PageRequest, PageSlice, ProductListParams, ProductQuery};
pub use crate::store::memory::MemoryStore;
pub use crate::store::postgres::PgStore;
pub use crate::store::CatalogStore;
