//! Book Manager
//!
//! Session-authenticated book catalog and rental server. Sessions live in
//! Redis so any number of stateless instances can serve the same users;
//! rentals and registrations are serialized per book id in PostgreSQL.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Probes used by the readiness endpoint
#[derive(Clone)]
pub struct Probes {
    pub repository: repository::Repository,
    pub sessions: services::redis::RedisSessionStore,
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub probes: Option<Arc<Probes>>,
}
