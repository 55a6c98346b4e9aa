// storefront/src/services/carts.rs

//! Carts and their items. Items are always addressed through their cart: an item id
//! that belongs to another cart is reported exactly like a missing one.

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{StorefrontError, StorefrontResult, UNKNOWN_CART_PRODUCT};
use crate::schema::{AddCartItemPayload, CartItemRepr, CartRepr, UpdateCartItemPayload};
use crate::store::CatalogStore;

fn item_not_found(cart_id: Uuid, id: i64) -> StorefrontError {
  StorefrontError::NotFound(format!("Cart item with ID {} not found in cart {}.", id, cart_id))
}

async fn require_cart(store: &dyn CatalogStore, cart_id: Uuid) -> StorefrontResult<()> {
  match store.get_cart(cart_id).await? {
    Some(_) => Ok(()),
    None => Err(StorefrontError::not_found("Cart", cart_id)),
  }
}

/// Creates an empty cart with a fresh server-generated id.
#[instrument(name = "service::create_cart", skip(store), err(Display))]
pub async fn create_cart(store: &dyn CatalogStore) -> StorefrontResult<CartRepr> {
  let cart = store.insert_cart().await?;
  info!(cart_id = %cart.id, "Cart created.");
  Ok(CartRepr::new(cart, Vec::new()))
}

/// The cart with every item and its product, loaded in one pass over the items.
#[instrument(name = "service::get_cart", skip(store), err(Display))]
pub async fn get_cart(store: &dyn CatalogStore, id: Uuid) -> StorefrontResult<CartRepr> {
  let cart = store
    .get_cart(id)
    .await?
    .ok_or_else(|| StorefrontError::not_found("Cart", id))?;
  let lines = store.list_cart_items(id).await?;
  Ok(CartRepr::new(cart, lines))
}

#[instrument(name = "service::delete_cart", skip(store), err(Display))]
pub async fn delete_cart(store: &dyn CatalogStore, id: Uuid) -> StorefrontResult<()> {
  if !store.delete_cart(id).await? {
    return Err(StorefrontError::not_found("Cart", id));
  }
  info!(cart_id = %id, "Cart deleted with its items.");
  Ok(())
}

#[instrument(name = "service::list_cart_items", skip(store), err(Display))]
pub async fn list_cart_items(store: &dyn CatalogStore, cart_id: Uuid) -> StorefrontResult<Vec<CartItemRepr>> {
  require_cart(store, cart_id).await?;
  let lines = store.list_cart_items(cart_id).await?;
  Ok(lines.into_iter().map(CartItemRepr::from).collect())
}

#[instrument(name = "service::get_cart_item", skip(store), err(Display))]
pub async fn get_cart_item(store: &dyn CatalogStore, cart_id: Uuid, id: i64) -> StorefrontResult<CartItemRepr> {
  require_cart(store, cart_id).await?;
  store
    .get_cart_item(cart_id, id)
    .await?
    .map(CartItemRepr::from)
    .ok_or_else(|| item_not_found(cart_id, id))
}

/// Adds a product to a cart. If the cart already holds that product the quantities are
/// merged into the existing line instead of creating a second one.
#[instrument(name = "service::add_cart_item", skip(store, payload), err(Display))]
pub async fn add_cart_item(
  store: &dyn CatalogStore,
  cart_id: Uuid,
  payload: AddCartItemPayload,
) -> StorefrontResult<CartItemRepr> {
  // Step 1: validate input
  let new_item = payload.validate()?;

  // Step 2: the cart must exist
  require_cart(store, cart_id).await?;

  // Step 3: the product must exist
  if store.get_product(new_item.product_id).await?.is_none() {
    warn!(product_id = new_item.product_id, "Add to cart rejected: unknown product.");
    return Err(StorefrontError::invalid("product_id", UNKNOWN_CART_PRODUCT));
  }

  // Step 4: atomic insert-or-increment
  let line = store
    .add_cart_item(cart_id, new_item.product_id, new_item.quantity)
    .await?;
  info!(
    cart_item_id = line.id,
    product_id = line.product_id,
    added = new_item.quantity,
    quantity = line.quantity,
    "Cart item added or merged."
  );
  Ok(line.into())
}

/// Replaces the quantity of an item. A rejected quantity leaves the stored value untouched.
#[instrument(name = "service::update_cart_item", skip(store, payload), err(Display))]
pub async fn update_cart_item(
  store: &dyn CatalogStore,
  cart_id: Uuid,
  id: i64,
  payload: UpdateCartItemPayload,
) -> StorefrontResult<CartItemRepr> {
  get_cart_item(store, cart_id, id).await?;
  let quantity = payload.validate()?;
  let line = store
    .set_cart_item_quantity(cart_id, id, quantity)
    .await?
    .ok_or_else(|| item_not_found(cart_id, id))?;
  info!(cart_item_id = id, quantity, "Cart item quantity updated.");
  Ok(line.into())
}

#[instrument(name = "service::delete_cart_item", skip(store), err(Display))]
pub async fn delete_cart_item(store: &dyn CatalogStore, cart_id: Uuid, id: i64) -> StorefrontResult<()> {
  require_cart(store, cart_id).await?;
  if !store.delete_cart_item(cart_id, id).await? {
    return Err(item_not_found(cart_id, id));
  }
  info!(cart_item_id = id, "Cart item deleted.");
  Ok(())
}
