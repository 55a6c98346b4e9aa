// storefront/src/query.rs

//! Declarative product listing: filters, search terms, ordering and paging.
//!
//! `ProductListParams` is the raw query string shape; `ProductQuery` is the typed
//! form both store backends execute. The in-memory backend evaluates the query with
//! the predicates defined here, the Postgres backend translates it to SQL.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{StorefrontError, StorefrontResult};
use crate::models::Product;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Blank query values (`?collection_id=`) count as absent.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: FromStr,
  T::Err: fmt::Display,
{
  let raw = Option::<String>::deserialize(deserializer)?;
  match raw.as_deref().map(str::trim) {
    None | Some("") => Ok(None),
    Some(value) => value.parse::<T>().map(Some).map_err(de::Error::custom),
  }
}

/// Query string accepted by `GET /products/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListParams {
  #[serde(default, deserialize_with = "blank_as_none")]
  pub collection_id: Option<i64>,
  #[serde(rename = "unit_price_cents__gt", default, deserialize_with = "blank_as_none")]
  pub unit_price_gt: Option<i64>,
  #[serde(rename = "unit_price_cents__lt", default, deserialize_with = "blank_as_none")]
  pub unit_price_lt: Option<i64>,
  pub search: Option<String>,
  pub ordering: Option<String>,
  /// Kept raw: any value that is not a usable page number is "Invalid page.", not a bad request.
  pub page: Option<String>,
}

/// Missing or blank means the first page; anything that is not a positive integer is not found.
fn parse_page_number(raw: Option<&str>) -> StorefrontResult<u32> {
  match raw.map(str::trim) {
    None | Some("") => Ok(1),
    Some(value) => value
      .parse::<u32>()
      .map_err(|_| StorefrontError::NotFound("Invalid page.".to_string())),
  }
}

impl ProductListParams {
  pub fn into_query(self, page_size: u32) -> StorefrontResult<ProductQuery> {
    let page = PageRequest::new(parse_page_number(self.page.as_deref())?, page_size)?;
    Ok(ProductQuery {
      filter: ProductFilter {
        collection_id: self.collection_id,
        unit_price_gt: self.unit_price_gt,
        unit_price_lt: self.unit_price_lt,
      },
      search: self.search.as_deref().map(parse_search_terms).unwrap_or_default(),
      ordering: self.ordering.as_deref().map(parse_ordering).unwrap_or_default(),
      page,
    })
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
  pub collection_id: Option<i64>,
  /// Strict lower bound on `unit_price_cents`.
  pub unit_price_gt: Option<i64>,
  /// Strict upper bound on `unit_price_cents`.
  pub unit_price_lt: Option<i64>,
}

impl ProductFilter {
  pub fn matches(&self, product: &Product) -> bool {
    let price = i64::from(product.unit_price_cents);
    self.collection_id.map_or(true, |id| product.collection_id == id)
      && self.unit_price_gt.map_or(true, |bound| price > bound)
      && self.unit_price_lt.map_or(true, |bound| price < bound)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKey {
  UnitPrice,
  LastUpdate,
}

impl OrderKey {
  fn parse(raw: &str) -> Option<Self> {
    match raw {
      "unit_price_cents" => Some(OrderKey::UnitPrice),
      "last_update" => Some(OrderKey::LastUpdate),
      _ => None,
    }
  }

  pub fn column(self) -> &'static str {
    match self {
      OrderKey::UnitPrice => "unit_price_cents",
      OrderKey::LastUpdate => "last_update",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTerm {
  pub key: OrderKey,
  pub descending: bool,
}

/// Parses `"unit_price_cents,-last_update"`. Unknown or repeated keys are dropped.
pub fn parse_ordering(raw: &str) -> Vec<OrderTerm> {
  let mut terms: Vec<OrderTerm> = Vec::new();
  for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
    let (descending, name) = match part.strip_prefix('-') {
      Some(rest) => (true, rest),
      None => (false, part),
    };
    if let Some(key) = OrderKey::parse(name) {
      if !terms.iter().any(|t| t.key == key) {
        terms.push(OrderTerm { key, descending });
      }
    }
  }
  terms
}

/// Splits a search string on whitespace and commas into lowercase terms.
pub fn parse_search_terms(raw: &str) -> Vec<String> {
  raw
    .split(|c: char| c.is_whitespace() || c == ',')
    .filter(|t| !t.is_empty())
    .map(str::to_lowercase)
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub number: u32,
  pub size: u32,
}

impl PageRequest {
  pub fn new(number: u32, size: u32) -> StorefrontResult<Self> {
    if number == 0 {
      return Err(StorefrontError::NotFound("Invalid page.".to_string()));
    }
    Ok(PageRequest {
      number,
      size: size.max(1),
    })
  }

  pub fn offset(&self) -> u64 {
    u64::from(self.number - 1) * u64::from(self.size)
  }

  pub fn limit(&self) -> u64 {
    u64::from(self.size)
  }

  pub fn has_previous(&self) -> bool {
    self.number > 1
  }

  pub fn has_next(&self, total: u64) -> bool {
    self.offset() + self.limit() < total
  }
}

impl Default for PageRequest {
  fn default() -> Self {
    PageRequest {
      number: 1,
      size: DEFAULT_PAGE_SIZE,
    }
  }
}

/// One page of results plus the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlice<T> {
  pub items: Vec<T>,
  pub total: u64,
}

impl<T> PageSlice<T> {
  pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageSlice<U> {
    PageSlice {
      items: self.items.into_iter().map(f).collect(),
      total: self.total,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
  pub filter: ProductFilter,
  /// Every term must occur in the title or the description.
  pub search: Vec<String>,
  pub ordering: Vec<OrderTerm>,
  pub page: PageRequest,
}

impl ProductQuery {
  pub fn matches(&self, product: &Product) -> bool {
    if !self.filter.matches(product) {
      return false;
    }
    let title = product.title.to_lowercase();
    let description = product.description.as_deref().unwrap_or_default().to_lowercase();
    self
      .search
      .iter()
      .all(|term| title.contains(term.as_str()) || description.contains(term.as_str()))
  }

  /// Requested ordering, falling back to ascending id.
  pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
    for term in &self.ordering {
      let ord = match term.key {
        OrderKey::UnitPrice => a.unit_price_cents.cmp(&b.unit_price_cents),
        OrderKey::LastUpdate => a.last_update.cmp(&b.last_update),
      };
      let ord = if term.descending { ord.reverse() } else { ord };
      if ord != Ordering::Equal {
        return ord;
      }
    }
    a.id.cmp(&b.id)
  }
}
