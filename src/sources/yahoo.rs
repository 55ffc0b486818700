//! Yahoo Finance API client for historical stock data.
//!
//! Uses the unofficial chart v8 endpoint, which needs no API key.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::services::market_data::{HistoryRequest, PriceHistoryProvider, ProviderError};
use crate::types::Bar;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

/// Normalize symbol for Yahoo Finance API.
/// Yahoo uses hyphens instead of dots for share classes (e.g., BRK-B not BRK.B)
fn normalize_yahoo_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase().replace('.', "-")
}

/// Query string for a history request. Ranges are inclusive of `end`.
fn query_params(request: &HistoryRequest) -> String {
    match request {
        HistoryRequest::Period { period, interval } => {
            format!("range={}&interval={}&includePrePost=false", period, interval)
        }
        HistoryRequest::Range {
            start,
            end,
            interval,
        } => {
            let to_unix = |d: NaiveDate| {
                d.and_hms_opt(0, 0, 0)
                    .map(|dt| dt.and_utc().timestamp())
                    .unwrap_or_default()
            };
            let period2 = end.succ_opt().map(to_unix).unwrap_or_else(|| to_unix(*end));
            format!(
                "period1={}&period2={}&interval={}&includePrePost=false",
                to_unix(*start),
                period2,
                interval
            )
        }
    }
}

/// Convert a chart response into bars.
///
/// Points without a positive close are skipped; missing open/high/low fall
/// back to the close. Repeated dates keep the first point.
fn parse_chart(data: YahooChartResponse) -> Result<Vec<Bar>, ProviderError> {
    if let Some(error) = data.chart.error {
        return Err(ProviderError::Api(format!(
            "{} - {}",
            error.code, error.description
        )));
    }

    let Some(result) = data.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let timestamps = result.timestamp.unwrap_or_default();
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let mut bars: Vec<Bar> = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let Some(close) = closes.get(i).copied().flatten().filter(|c| *c > 0.0) else {
            continue;
        };
        let Some(date) = DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive()) else {
            continue;
        };
        if bars.last().is_some_and(|b| b.date == date) {
            continue;
        }

        bars.push(Bar {
            date,
            open: opens.get(i).copied().flatten().unwrap_or(close),
            high: highs.get(i).copied().flatten().unwrap_or(close),
            low: lows.get(i).copied().flatten().unwrap_or(close),
            close,
            volume: volumes.get(i).copied().flatten().unwrap_or(0),
        });
    }

    Ok(bars)
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
}

impl YahooFinanceClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// Fetch historical bars for a symbol.
    ///
    /// Periods: "1mo", "3mo", "6mo", "1y", "2y", "5y", "ytd", "max".
    /// Intervals: "1d", "5d", "1wk", "1mo" (intraday intervals collapse to one
    /// bar per date).
    pub async fn get_historical_data(
        &self,
        symbol: &str,
        request: &HistoryRequest,
    ) -> Result<Vec<Bar>, ProviderError> {
        let url = format!(
            "{}/{}?{}",
            CHART_URL,
            normalize_yahoo_symbol(symbol),
            query_params(request)
        );

        debug!("Fetching Yahoo Finance data: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        // Unknown symbols come back as 404 with an error body.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(ProviderError::Api(format!("HTTP {}", response.status())));
        }

        let data: YahooChartResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let bars = parse_chart(data)?;
        debug!("Yahoo returned {} bars for {}", bars.len(), symbol);
        Ok(bars)
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceHistoryProvider for YahooFinanceClient {
    async fn fetch(
        &self,
        symbol: &str,
        request: &HistoryRequest,
    ) -> Result<Vec<Bar>, ProviderError> {
        self.get_historical_data(symbol, request).await
    }
}
