// storefront/src/store/postgres.rs

//! `CatalogStore` on Postgres through sqlx runtime queries (no compile-time checked macros,
//! so building does not need a live database). Schema lives in `core/migrations/`.

use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::CatalogStore;
use crate::error::{StorefrontError, StorefrontResult, COLLECTION_HAS_PRODUCTS, PRODUCT_HAS_ORDERS, UNKNOWN_CART_PRODUCT};
use crate::models::{Cart, CartLine, Collection, Product, Review};
use crate::query::{PageSlice, ProductQuery};
use crate::schema::{CollectionDraft, ProductDraft, ReviewDraft};

const COLLECTION_COLUMNS: &str = "c.id, c.title, c.featured_product_id";

const PRODUCT_SELECT: &str =
  "SELECT id, title, slug, description, unit_price_cents, inventory, last_update, collection_id FROM products";
const PRODUCT_RETURNING: &str =
  "RETURNING id, title, slug, description, unit_price_cents, inventory, last_update, collection_id";

const REVIEW_RETURNING: &str = "RETURNING id, product_id, name, description, date";

const CART_LINE_COLUMNS: &str = "ci.id, ci.cart_id, ci.quantity, p.id AS product_id, \
   p.title AS product_title, p.unit_price_cents AS product_unit_price_cents";

/// SQLSTATE for "integer out of range".
const NUMERIC_OUT_OF_RANGE: &str = "22003";

/// Name of the foreign key constraint an error violated, if it is such an error.
fn violated_foreign_key(err: &sqlx::Error) -> Option<String> {
  match err {
    sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
      Some(db_err.constraint().unwrap_or_default().to_string())
    }
    _ => None,
  }
}

fn is_out_of_range(err: &sqlx::Error) -> bool {
  match err {
    sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(NUMERIC_OUT_OF_RANGE),
    _ => false,
  }
}

fn storage(err: sqlx::Error, context: &'static str) -> StorefrontError {
  StorefrontError::Storage(anyhow::Error::new(err).context(context))
}

/// Escapes `%`, `_` and `\` so a search term matches literally inside `ILIKE`.
fn escape_like(term: &str) -> String {
  let mut escaped = String::with_capacity(term.len());
  for ch in term.chars() {
    if matches!(ch, '%' | '_' | '\\') {
      escaped.push('\\');
    }
    escaped.push(ch);
  }
  escaped
}

fn push_product_conditions(qb: &mut QueryBuilder<'static, Postgres>, query: &ProductQuery) {
  qb.push(" WHERE TRUE");
  if let Some(collection_id) = query.filter.collection_id {
    qb.push(" AND collection_id = ").push_bind(collection_id);
  }
  if let Some(bound) = query.filter.unit_price_gt {
    qb.push(" AND unit_price_cents > ").push_bind(bound);
  }
  if let Some(bound) = query.filter.unit_price_lt {
    qb.push(" AND unit_price_cents < ").push_bind(bound);
  }
  for term in &query.search {
    let pattern = format!("%{}%", escape_like(term));
    qb.push(" AND (title ILIKE ")
      .push_bind(pattern.clone())
      .push(" OR description ILIKE ")
      .push_bind(pattern)
      .push(")");
  }
}

#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn from_pool(pool: PgPool) -> Self {
    PgStore { pool }
  }

  #[instrument(name = "PgStore::connect", skip(database_url))]
  pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect(database_url)
      .await?;
    info!("Successfully connected to the database.");
    Ok(PgStore { pool })
  }

  /// Applies the embedded migrations from `core/migrations/`.
  pub async fn migrate(&self) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(&self.pool).await?;
    info!("Database migrations applied.");
    Ok(())
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }
}

#[async_trait]
impl CatalogStore for PgStore {
  async fn list_collections(&self) -> StorefrontResult<Vec<Collection>> {
    let sql = format!(
      "SELECT {COLLECTION_COLUMNS}, COUNT(p.id) AS products_count \
       FROM collections c LEFT JOIN products p ON p.collection_id = c.id \
       GROUP BY c.id ORDER BY c.id"
    );
    let collections = sqlx::query_as::<_, Collection>(&sql)
      .fetch_all(&self.pool)
      .await
      .context("listing collections")?;
    Ok(collections)
  }

  async fn get_collection(&self, id: i64) -> StorefrontResult<Option<Collection>> {
    let sql = format!(
      "SELECT {COLLECTION_COLUMNS}, COUNT(p.id) AS products_count \
       FROM collections c LEFT JOIN products p ON p.collection_id = c.id \
       WHERE c.id = $1 GROUP BY c.id"
    );
    let collection = sqlx::query_as::<_, Collection>(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .context("fetching collection")?;
    Ok(collection)
  }

  async fn insert_collection(&self, draft: &CollectionDraft) -> StorefrontResult<Collection> {
    let sql = format!(
      "WITH c AS (INSERT INTO collections (title, featured_product_id) VALUES ($1, $2) RETURNING *) \
       SELECT {COLLECTION_COLUMNS}, 0::BIGINT AS products_count FROM c"
    );
    sqlx::query_as::<_, Collection>(&sql)
      .bind(&draft.title)
      .bind(draft.featured_product_id)
      .fetch_one(&self.pool)
      .await
      .map_err(|e| match (violated_foreign_key(&e), draft.featured_product_id) {
        (Some(_), Some(product_id)) => StorefrontError::invalid_reference("featured_product_id", product_id),
        _ => storage(e, "inserting collection"),
      })
  }

  async fn update_collection(&self, id: i64, draft: &CollectionDraft) -> StorefrontResult<Option<Collection>> {
    let sql = format!(
      "WITH c AS (UPDATE collections SET title = $2, featured_product_id = $3 WHERE id = $1 RETURNING *) \
       SELECT {COLLECTION_COLUMNS}, \
         (SELECT COUNT(*) FROM products p WHERE p.collection_id = c.id) AS products_count \
       FROM c"
    );
    sqlx::query_as::<_, Collection>(&sql)
      .bind(id)
      .bind(&draft.title)
      .bind(draft.featured_product_id)
      .fetch_optional(&self.pool)
      .await
      .map_err(|e| match (violated_foreign_key(&e), draft.featured_product_id) {
        (Some(_), Some(product_id)) => StorefrontError::invalid_reference("featured_product_id", product_id),
        _ => storage(e, "updating collection"),
      })
  }

  async fn count_products_in_collection(&self, id: i64) -> StorefrontResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE collection_id = $1")
      .bind(id)
      .fetch_one(&self.pool)
      .await
      .context("counting products in collection")?;
    Ok(count)
  }

  async fn delete_collection(&self, id: i64) -> StorefrontResult<bool> {
    let result = sqlx::query("DELETE FROM collections WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(|e| match violated_foreign_key(&e) {
        Some(constraint) => {
          warn!(collection_id = id, %constraint, "Collection delete blocked by a concurrent product assignment.");
          StorefrontError::ReferentialGuard(COLLECTION_HAS_PRODUCTS.to_string())
        }
        None => storage(e, "deleting collection"),
      })?;
    Ok(result.rows_affected() > 0)
  }

  #[instrument(name = "PgStore::list_products", skip(self), err(Display))]
  async fn list_products(&self, query: &ProductQuery) -> StorefrontResult<PageSlice<Product>> {
    let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
    push_product_conditions(&mut count_qb, query);

    let mut rows_qb = QueryBuilder::<Postgres>::new(PRODUCT_SELECT);
    push_product_conditions(&mut rows_qb, query);
    rows_qb.push(" ORDER BY ");
    for term in &query.ordering {
      rows_qb
        .push(term.key.column())
        .push(if term.descending { " DESC, " } else { " ASC, " });
    }
    rows_qb.push("id ASC");
    rows_qb
      .push(" LIMIT ")
      .push_bind(query.page.limit() as i64)
      .push(" OFFSET ")
      .push_bind(query.page.offset() as i64);

    let count_query = count_qb.build_query_scalar::<i64>();
    let rows_query = rows_qb.build_query_as::<Product>();
    let (total, items) = futures_util::try_join!(count_query.fetch_one(&self.pool), rows_query.fetch_all(&self.pool))
      .context("listing products")?;
    debug!(total, returned = items.len(), "Product page fetched.");

    Ok(PageSlice {
      items,
      total: total.max(0) as u64,
    })
  }

  async fn get_product(&self, id: i64) -> StorefrontResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!("{PRODUCT_SELECT} WHERE id = $1"))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .context("fetching product")?;
    Ok(product)
  }

  async fn insert_product(&self, draft: &ProductDraft) -> StorefrontResult<Product> {
    let sql = format!(
      "INSERT INTO products (title, slug, description, unit_price_cents, inventory, collection_id) \
       VALUES ($1, $2, $3, $4, $5, $6) {PRODUCT_RETURNING}"
    );
    sqlx::query_as::<_, Product>(&sql)
      .bind(&draft.title)
      .bind(&draft.slug)
      .bind(&draft.description)
      .bind(draft.unit_price_cents)
      .bind(draft.inventory)
      .bind(draft.collection_id)
      .fetch_one(&self.pool)
      .await
      .map_err(|e| match violated_foreign_key(&e) {
        Some(_) => StorefrontError::invalid_reference("collection_id", draft.collection_id),
        None => storage(e, "inserting product"),
      })
  }

  async fn update_product(&self, id: i64, draft: &ProductDraft) -> StorefrontResult<Option<Product>> {
    let sql = format!(
      "UPDATE products SET title = $2, slug = $3, description = $4, unit_price_cents = $5, \
       inventory = $6, collection_id = $7, last_update = NOW() WHERE id = $1 {PRODUCT_RETURNING}"
    );
    sqlx::query_as::<_, Product>(&sql)
      .bind(id)
      .bind(&draft.title)
      .bind(&draft.slug)
      .bind(&draft.description)
      .bind(draft.unit_price_cents)
      .bind(draft.inventory)
      .bind(draft.collection_id)
      .fetch_optional(&self.pool)
      .await
      .map_err(|e| match violated_foreign_key(&e) {
        Some(_) => StorefrontError::invalid_reference("collection_id", draft.collection_id),
        None => storage(e, "updating product"),
      })
  }

  async fn count_order_items_for_product(&self, id: i64) -> StorefrontResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM order_items WHERE product_id = $1")
      .bind(id)
      .fetch_one(&self.pool)
      .await
      .context("counting order items for product")?;
    Ok(count)
  }

  async fn delete_product(&self, id: i64) -> StorefrontResult<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(|e| match violated_foreign_key(&e) {
        Some(constraint) => {
          warn!(product_id = id, %constraint, "Product delete blocked by a concurrent order item.");
          StorefrontError::ReferentialGuard(PRODUCT_HAS_ORDERS.to_string())
        }
        None => storage(e, "deleting product"),
      })?;
    Ok(result.rows_affected() > 0)
  }

  async fn list_reviews(&self, product_id: i64) -> StorefrontResult<Vec<Review>> {
    let reviews = sqlx::query_as::<_, Review>(
      "SELECT id, product_id, name, description, date FROM reviews WHERE product_id = $1 ORDER BY id",
    )
    .bind(product_id)
    .fetch_all(&self.pool)
    .await
    .context("listing reviews")?;
    Ok(reviews)
  }

  async fn get_review(&self, product_id: i64, id: i64) -> StorefrontResult<Option<Review>> {
    let review = sqlx::query_as::<_, Review>(
      "SELECT id, product_id, name, description, date FROM reviews WHERE product_id = $1 AND id = $2",
    )
    .bind(product_id)
    .bind(id)
    .fetch_optional(&self.pool)
    .await
    .context("fetching review")?;
    Ok(review)
  }

  async fn insert_review(&self, product_id: i64, draft: &ReviewDraft) -> StorefrontResult<Review> {
    let sql = format!("INSERT INTO reviews (product_id, name, description) VALUES ($1, $2, $3) {REVIEW_RETURNING}");
    sqlx::query_as::<_, Review>(&sql)
      .bind(product_id)
      .bind(&draft.name)
      .bind(&draft.description)
      .fetch_one(&self.pool)
      .await
      .map_err(|e| match violated_foreign_key(&e) {
        Some(_) => StorefrontError::not_found("Product", product_id),
        None => storage(e, "inserting review"),
      })
  }

  async fn update_review(&self, product_id: i64, id: i64, draft: &ReviewDraft) -> StorefrontResult<Option<Review>> {
    let sql = format!(
      "UPDATE reviews SET name = $3, description = $4 WHERE product_id = $1 AND id = $2 {REVIEW_RETURNING}"
    );
    let review = sqlx::query_as::<_, Review>(&sql)
      .bind(product_id)
      .bind(id)
      .bind(&draft.name)
      .bind(&draft.description)
      .fetch_optional(&self.pool)
      .await
      .context("updating review")?;
    Ok(review)
  }

  async fn delete_review(&self, product_id: i64, id: i64) -> StorefrontResult<bool> {
    let result = sqlx::query("DELETE FROM reviews WHERE product_id = $1 AND id = $2")
      .bind(product_id)
      .bind(id)
      .execute(&self.pool)
      .await
      .context("deleting review")?;
    Ok(result.rows_affected() > 0)
  }

  async fn insert_cart(&self) -> StorefrontResult<Cart> {
    let cart = sqlx::query_as::<_, Cart>("INSERT INTO carts (id) VALUES ($1) RETURNING id, created_at")
      .bind(Uuid::new_v4())
      .fetch_one(&self.pool)
      .await
      .context("inserting cart")?;
    Ok(cart)
  }

  async fn get_cart(&self, id: Uuid) -> StorefrontResult<Option<Cart>> {
    let cart = sqlx::query_as::<_, Cart>("SELECT id, created_at FROM carts WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .context("fetching cart")?;
    Ok(cart)
  }

  async fn delete_cart(&self, id: Uuid) -> StorefrontResult<bool> {
    let result = sqlx::query("DELETE FROM carts WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .context("deleting cart")?;
    Ok(result.rows_affected() > 0)
  }

  async fn list_cart_items(&self, cart_id: Uuid) -> StorefrontResult<Vec<CartLine>> {
    let sql = format!(
      "SELECT {CART_LINE_COLUMNS} FROM cart_items ci JOIN products p ON p.id = ci.product_id \
       WHERE ci.cart_id = $1 ORDER BY ci.id"
    );
    let lines = sqlx::query_as::<_, CartLine>(&sql)
      .bind(cart_id)
      .fetch_all(&self.pool)
      .await
      .context("listing cart items")?;
    Ok(lines)
  }

  async fn get_cart_item(&self, cart_id: Uuid, id: i64) -> StorefrontResult<Option<CartLine>> {
    let sql = format!(
      "SELECT {CART_LINE_COLUMNS} FROM cart_items ci JOIN products p ON p.id = ci.product_id \
       WHERE ci.cart_id = $1 AND ci.id = $2"
    );
    let line = sqlx::query_as::<_, CartLine>(&sql)
      .bind(cart_id)
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .context("fetching cart item")?;
    Ok(line)
  }

  /// One statement: the unique `(cart_id, product_id)` constraint turns a second insert into
  /// an in-place increment, so concurrent adds can never produce duplicate lines.
  #[instrument(name = "PgStore::add_cart_item", skip(self), err(Display))]
  async fn add_cart_item(&self, cart_id: Uuid, product_id: i64, quantity: i32) -> StorefrontResult<CartLine> {
    let sql = format!(
      "WITH ci AS ( \
         INSERT INTO cart_items (cart_id, product_id, quantity) VALUES ($1, $2, $3) \
         ON CONFLICT (cart_id, product_id) DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity \
         RETURNING id, cart_id, product_id, quantity \
       ) \
       SELECT {CART_LINE_COLUMNS} FROM ci JOIN products p ON p.id = ci.product_id"
    );
    sqlx::query_as::<_, CartLine>(&sql)
      .bind(cart_id)
      .bind(product_id)
      .bind(quantity)
      .fetch_one(&self.pool)
      .await
      .map_err(|e| {
        if let Some(constraint) = violated_foreign_key(&e) {
          if constraint == "cart_items_product_id_fkey" {
            StorefrontError::invalid("product_id", UNKNOWN_CART_PRODUCT)
          } else {
            StorefrontError::not_found("Cart", cart_id)
          }
        } else if is_out_of_range(&e) {
          StorefrontError::invalid("quantity", "Resulting quantity is too large.")
        } else if matches!(e, sqlx::Error::RowNotFound) {
          StorefrontError::invalid("product_id", UNKNOWN_CART_PRODUCT)
        } else {
          storage(e, "upserting cart item")
        }
      })
  }

  async fn set_cart_item_quantity(&self, cart_id: Uuid, id: i64, quantity: i32) -> StorefrontResult<Option<CartLine>> {
    let sql = format!(
      "WITH ci AS ( \
         UPDATE cart_items SET quantity = $3 WHERE cart_id = $1 AND id = $2 \
         RETURNING id, cart_id, product_id, quantity \
       ) \
       SELECT {CART_LINE_COLUMNS} FROM ci JOIN products p ON p.id = ci.product_id"
    );
    let line = sqlx::query_as::<_, CartLine>(&sql)
      .bind(cart_id)
      .bind(id)
      .bind(quantity)
      .fetch_optional(&self.pool)
      .await
      .context("updating cart item quantity")?;
    Ok(line)
  }

  async fn delete_cart_item(&self, cart_id: Uuid, id: i64) -> StorefrontResult<bool> {
    let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND id = $2")
      .bind(cart_id)
      .bind(id)
      .execute(&self.pool)
      .await
      .context("deleting cart item")?;
    Ok(result.rows_affected() > 0)
  }
}
