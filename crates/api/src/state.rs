use std::sync::Arc;

use yamdb_mail::Mailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: yamdb_db::DbPool,
    /// Server configuration (JWT settings, confirmation code lifetime).
    pub config: Arc<ServerConfig>,
    /// Delivers confirmation codes during signup.
    pub mailer: Arc<dyn Mailer>,
}
