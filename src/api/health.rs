use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// Whether analyses carry an `ai` verdict.
    classifier: bool,
    scheduler: bool,
    companies: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        classifier: state.analysis.has_classifier(),
        scheduler: state.config.scheduler.enabled,
        companies: state.store.company_count(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}
