// storefront/src/models/mod.rs

//! Contains data structures representing database rows.

pub mod cart;
pub mod collection;
pub mod order_item;
pub mod product;
pub mod review;

pub use cart::{Cart, CartItem, CartLine};
pub use collection::Collection;
pub use order_item::OrderItem;
pub use product::Product;
pub use review::Review;
