// storefront_server/src/web/pagination.rs

use actix_web::HttpRequest;
use serde::Serialize;
use storefront::{PageRequest, PageSlice};

/// `{count, next, previous, results}` page envelope. `next` and `previous` are absolute
/// URLs that keep every other query parameter of the current request.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
  pub count: u64,
  pub next: Option<String>,
  pub previous: Option<String>,
  pub results: Vec<T>,
}

impl<T> Paginated<T> {
  pub fn new(req: &HttpRequest, page: PageRequest, slice: PageSlice<T>) -> Self {
    let next = page
      .has_next(slice.total)
      .then(|| page_url(req, Some(page.number + 1)));
    // The first page is linked without a page parameter.
    let previous = page.has_previous().then(|| {
      let target = page.number - 1;
      page_url(req, (target > 1).then_some(target))
    });
    Self {
      count: slice.total,
      next,
      previous,
      results: slice.items,
    }
  }
}

fn page_url(req: &HttpRequest, page: Option<u32>) -> String {
  let info = req.connection_info();
  let mut params: Vec<String> = req
    .query_string()
    .split('&')
    .filter(|pair| !pair.is_empty() && pair.split('=').next() != Some("page"))
    .map(str::to_string)
    .collect();
  if let Some(page) = page {
    params.push(format!("page={}", page));
  }

  let mut url = format!("{}://{}{}", info.scheme(), info.host(), req.path());
  if !params.is_empty() {
    url.push('?');
    url.push_str(&params.join("&"));
  }
  url
}
