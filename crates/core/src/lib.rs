//! Domain rules for the YaMDB review service.
//!
//! Everything here is pure and storage-agnostic: the `db` crate persists the
//! entities, the `api` crate wires these rules into HTTP handlers.

pub mod confirmation;
pub mod error;
pub mod pagination;
pub mod permissions;
pub mod rating;
pub mod roles;
pub mod types;
pub mod validation;
