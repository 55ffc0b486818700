use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::auth::Authenticated;
use crate::error::Result;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/predict", get(predict))
}

#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    pub symbol: String,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub symbol: String,
    pub ai_prediction: String,
    pub confidence: f64,
}

/// GET /api/ai/predict?symbol=
async fn predict(
    State(state): State<AppState>,
    _auth: Authenticated,
    Query(query): Query<PredictQuery>,
) -> Result<Json<PredictResponse>> {
    let verdict = state.analysis.predict(&query.symbol).await?;
    Ok(Json(PredictResponse {
        symbol: query.symbol.to_uppercase(),
        ai_prediction: verdict.signal,
        confidence: verdict.confidence,
    }))
}
