//! Title entity model, DTOs, and list filters.

use sqlx::FromRow;
use yamdb_core::types::DbId;

use super::taxon::Taxon;

/// A title row joined with its category.
#[derive(Debug, Clone, FromRow)]
pub struct Title {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: DbId,
    pub category_name: String,
    pub category_slug: String,
}

/// A genre attached to a title, as returned by the batch genre lookup.
#[derive(Debug, Clone, FromRow)]
pub struct TitleGenre {
    pub title_id: DbId,
    #[sqlx(flatten)]
    pub genre: Taxon,
}

/// DTO for creating a title. Category and genres are already resolved to ids.
#[derive(Debug, Clone)]
pub struct CreateTitle {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: DbId,
    pub genre_ids: Vec<DbId>,
}

/// DTO for updating a title. `genre_ids`, when present, replaces the whole set.
#[derive(Debug, Clone, Default)]
pub struct UpdateTitle {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub genre_ids: Option<Vec<DbId>>,
}

/// Sort order for title listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleOrdering {
    #[default]
    NameAsc,
    NameDesc,
    YearAsc,
    YearDesc,
    CategoryAsc,
    CategoryDesc,
}

impl TitleOrdering {
    /// Parse an `?ordering=` value: `name`, `year` or `category` (by
    /// category name), each optionally prefixed with `-` for descending.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "name" => Some(Self::NameAsc),
            "-name" => Some(Self::NameDesc),
            "year" => Some(Self::YearAsc),
            "-year" => Some(Self::YearDesc),
            "category" => Some(Self::CategoryAsc),
            "-category" => Some(Self::CategoryDesc),
            _ => None,
        }
    }

    /// `ORDER BY` clause body. Ties fall back to id for stable paging.
    pub(crate) fn sql(self) -> &'static str {
        match self {
            Self::NameAsc => "t.name ASC, t.id ASC",
            Self::NameDesc => "t.name DESC, t.id DESC",
            Self::YearAsc => "t.year ASC, t.id ASC",
            Self::YearDesc => "t.year DESC, t.id DESC",
            Self::CategoryAsc => "c.name ASC, t.id ASC",
            Self::CategoryDesc => "c.name DESC, t.id DESC",
        }
    }
}

/// Filters for title listings. `None` fields do not constrain the result.
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    /// Case-insensitive substring of the title name.
    pub name: Option<String>,
    pub year: Option<i32>,
    /// Exact genre slug.
    pub genre: Option<String>,
    /// Exact category slug.
    pub category: Option<String>,
    pub ordering: TitleOrdering,
}
