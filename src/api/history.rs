use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::auth::Authenticated;
use crate::error::Result;
use crate::types::AnalysisRecord;
use crate::AppState;

/// Upper bound on `limit`.
const MAX_HISTORY: usize = 100;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_history))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

/// GET /api/history
async fn get_history(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<AnalysisRecord>>> {
    let limit = query.limit.min(MAX_HISTORY);
    let records = state.store.get_user_history(&auth.user.username, limit)?;
    Ok(Json(records))
}
