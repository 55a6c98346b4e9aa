// storefront/src/services/mod.rs

//! Operations behind each resource endpoint. Every function takes the store as
//! `&dyn CatalogStore`, validates payloads, enforces path scoping and guard rules, and
//! returns wire representations.

pub mod carts;
pub mod collections;
pub mod products;
pub mod reviews;
