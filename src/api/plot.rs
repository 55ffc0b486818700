use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::error::Result;
use crate::types::ChartData;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:symbol", get(get_plot))
}

/// GET /api/plot/:symbol
///
/// Close, SMA(20) and Bollinger bands for the most recent 100 days.
async fn get_plot(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ChartData>> {
    let data = state.analysis.chart_data(&symbol).await?;
    Ok(Json(data))
}
