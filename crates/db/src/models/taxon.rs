//! Categories and genres.
//!
//! Both tables have the same shape, so they share one row type and one
//! repository; [`TaxonKind`] selects the table.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::DbId;

/// Which classification table a [`Taxon`] lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonKind {
    Category,
    Genre,
}

impl TaxonKind {
    pub fn table(self) -> &'static str {
        match self {
            TaxonKind::Category => "categories",
            TaxonKind::Genre => "genres",
        }
    }

    /// Entity name used in error messages.
    pub fn entity(self) -> &'static str {
        match self {
            TaxonKind::Category => "Category",
            TaxonKind::Genre => "Genre",
        }
    }
}

/// A row from `categories` or `genres`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Taxon {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

/// DTO for creating a category or genre.
#[derive(Debug, Clone)]
pub struct CreateTaxon {
    pub name: String,
    pub slug: String,
}
