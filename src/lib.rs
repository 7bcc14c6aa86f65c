//! ILMS Server
//!
//! An integrated library management server providing a REST JSON API for
//! the book catalog, member registry, librarian accounts and the lending
//! ledger.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod ident;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
