use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::error::Result;
use crate::types::{ScreenerFilter, ScreenerHit};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(screen))
}

/// Symbols to scan: the company directory, or the watchlist when the
/// directory is empty.
fn universe(state: &AppState) -> Result<Vec<String>> {
    let limit = state.config.screener_max_symbols;
    let symbols: Vec<String> = state
        .store
        .list_companies(limit)?
        .into_iter()
        .map(|c| c.symbol)
        .collect();
    if !symbols.is_empty() {
        return Ok(symbols);
    }
    Ok(state
        .config
        .scheduler
        .watchlist
        .iter()
        .take(limit)
        .cloned()
        .collect())
}

/// GET /api/screener?rsi_lt=&macd_gt=&sma_lt=&sma_gt=
async fn screen(
    State(state): State<AppState>,
    Query(filter): Query<ScreenerFilter>,
) -> Result<Json<Vec<ScreenerHit>>> {
    let symbols = universe(&state)?;
    let hits = state.analysis.screen(&symbols, &filter).await;
    Ok(Json(hits))
}
