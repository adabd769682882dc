//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches

pub mod authored;
pub mod comment;
pub mod review;
pub mod taxon;
pub mod title;
pub mod user;
