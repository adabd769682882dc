//! Shared response envelope types for API handlers.
//!
//! Listings use the `{ "count", "next", "previous", "results" }` envelope.
//! `next`/`previous` are request-relative links that keep every other query
//! parameter of the original request.

use axum::http::Uri;
use serde::Serialize;

use crate::query::PageWindow;

/// Paginated listing envelope.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    /// Total number of matching items across all pages.
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T: Serialize> Page<T> {
    /// Wrap one page of `results` out of `count` total matches.
    pub fn new(results: Vec<T>, count: i64, window: PageWindow, uri: &Uri) -> Self {
        let PageWindow { limit, offset } = window;
        let next_offset = offset.saturating_add(limit);
        let next = (next_offset < count).then(|| page_link(uri, limit, next_offset));
        let previous = (offset > 0).then(|| page_link(uri, limit, (offset - limit).max(0)));
        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

/// `uri` with its `limit`/`offset` parameters replaced.
fn page_link(uri: &Uri, limit: i64, offset: i64) -> String {
    let mut params: Vec<String> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or_default();
            key != "limit" && key != "offset"
        })
        .map(str::to_string)
        .collect();
    params.push(format!("limit={limit}"));
    params.push(format!("offset={offset}"));
    format!("{}?{}", uri.path(), params.join("&"))
}
