//! TickerLens - stock technical analysis with weighted trading decisions

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use std::sync::Arc;

use config::Config;
use services::{AnalysisService, AuthService, SqliteStore};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<SqliteStore>,
    pub auth_service: Arc<AuthService>,
    pub analysis: Arc<AnalysisService>,
}

// Re-export commonly used types
pub use types::*;
