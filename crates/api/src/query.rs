//! Shared query parameter types for API handlers.

use serde::Deserialize;
use yamdb_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamped `(limit, offset)` window to pass to the repository layer.
    pub fn window(&self) -> PageWindow {
        PageWindow {
            limit: clamp_limit(self.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
            offset: clamp_offset(self.offset),
        }
    }
}

/// A validated slice of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
}

/// `?search=` for categories, genres and the admin user list.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

impl SearchParams {
    /// The search term, with blank input treated as absent.
    pub fn term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Title list filters (`?name=&year=&genre=&category=&ordering=`).
#[derive(Debug, Default, Deserialize)]
pub struct TitleListParams {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub category: Option<String>,
    pub ordering: Option<String>,
}
