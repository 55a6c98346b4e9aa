// storefront_server/src/web/handlers/mod.rs

// One module per resource
pub mod cart_handlers;
pub mod cart_item_handlers;
pub mod collection_handlers;
pub mod product_handlers;
pub mod review_handlers;
