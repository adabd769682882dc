//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod comment_repo;
pub mod review_repo;
pub mod taxon_repo;
pub mod title_repo;
pub mod user_repo;

pub use comment_repo::CommentRepo;
pub use review_repo::ReviewRepo;
pub use taxon_repo::TaxonRepo;
pub use title_repo::TitleRepo;
pub use user_repo::UserRepo;

/// Build an `ILIKE` pattern matching `term` anywhere, with `%`, `_` and `\`
/// in the term matched literally.
pub(crate) fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
