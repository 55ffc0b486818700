pub mod ai;
pub mod auth;
pub mod companies;
pub mod health;
pub mod history;
pub mod plot;
pub mod screener;
pub mod stocks;

use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/auth", auth::router())
        .nest("/api/stocks", stocks::router())
        .nest("/api/plot", plot::router())
        .nest("/api/history", history::router())
        .nest("/api/companies", companies::router())
        .nest("/api/screener", screener::router())
        .nest("/api/ai", ai::router())
}
