//! Stock data and analysis endpoints.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::api::auth::Authenticated;
use crate::error::{AppError, Result};
use crate::services::HistoryRequest;
use crate::types::{AnalysisResult, IndicatorSelection, StockRow};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:symbol", get(get_stock))
        .route("/analyze/:symbol", get(analyze_stock))
        .route("/analyze/:symbol/csv", get(analyze_stock_csv))
}

#[derive(Debug, Deserialize)]
pub struct StockQuery {
    #[serde(default = "default_stock_period")]
    pub period: String,
    #[serde(default = "default_interval")]
    pub interval: String,
}

fn default_stock_period() -> String {
    "1y".to_string()
}

fn default_analysis_period() -> String {
    "6mo".to_string()
}

fn default_interval() -> String {
    "1d".to_string()
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    #[serde(default = "default_analysis_period")]
    pub period: String,
    #[serde(default = "default_interval")]
    pub interval: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Comma-separated indicator identifiers.
    pub indicators: Option<String>,
}

impl AnalyzeQuery {
    /// An explicit date range wins over `period`; a half-open range is
    /// rejected.
    fn history_request(&self) -> Result<HistoryRequest> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start <= end => Ok(HistoryRequest::Range {
                start,
                end,
                interval: self.interval.clone(),
            }),
            (Some(_), Some(_)) => Err(AppError::BadRequest(
                "start_date must not be after end_date".to_string(),
            )),
            (None, None) => Ok(HistoryRequest::period(&self.period, &self.interval)),
            _ => Err(AppError::BadRequest(
                "start_date and end_date must be given together".to_string(),
            )),
        }
    }

    fn selection(&self) -> IndicatorSelection {
        IndicatorSelection::from_csv(self.indicators.as_deref())
    }
}

/// GET /api/stocks/:symbol
async fn get_stock(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<StockQuery>,
) -> Result<Json<Vec<StockRow>>> {
    let request = HistoryRequest::period(&query.period, &query.interval);
    let rows = state.analysis.stock_table(&symbol, &request).await?;
    Ok(Json(rows))
}

async fn run_analysis(
    state: &AppState,
    auth: &Authenticated,
    symbol: &str,
    query: &AnalyzeQuery,
) -> Result<AnalysisResult> {
    let request = query.history_request()?;
    let selection = query.selection();
    let result = state.analysis.analyze(symbol, &request, &selection).await?;

    info!(
        "[{}] Final decision: {} ({:.2}) for {}",
        result.symbol,
        result.final_decision.signal.label(),
        result.final_decision.confidence,
        auth.user.username
    );
    state
        .analysis
        .record_history(&auth.user.username, &result, &selection);
    Ok(result)
}

/// GET /api/stocks/analyze/:symbol
async fn analyze_stock(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(symbol): Path<String>,
    Query(query): Query<AnalyzeQuery>,
) -> Result<Json<AnalysisResult>> {
    let result = run_analysis(&state, &auth, &symbol, &query).await?;
    Ok(Json(result))
}

/// GET /api/stocks/analyze/:symbol/csv
async fn analyze_stock_csv(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(symbol): Path<String>,
    Query(query): Query<AnalyzeQuery>,
) -> Result<impl IntoResponse> {
    let result = run_analysis(&state, &auth, &symbol, &query).await?;
    let body = analysis_csv(&result)?;
    let disposition = format!("attachment; filename={}_analysis.csv", result.symbol);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

/// `Field,Value` rows: latest values, then signals, then the decision.
pub fn analysis_csv(result: &AnalysisResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Field", "Value"])?;
    writer.write_record(["symbol", result.symbol.as_str()])?;
    for (label, value) in result.latest.iter() {
        writer.write_record([label.to_string(), value.to_string()])?;
    }
    for (label, direction) in result.signals.iter() {
        writer.write_record([format!("{}_signal", label), direction.label().to_string()])?;
    }
    writer.write_record([
        "final_decision",
        result.final_decision.signal.label(),
    ])?;
    writer.write_record([
        "confidence".to_string(),
        result.final_decision.confidence.to_string(),
    ])?;

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(e.to_string()))
}
