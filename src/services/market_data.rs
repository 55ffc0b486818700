//! Price-history provider abstraction.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;
use thiserror::Error;

use crate::types::Bar;

/// How much history to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryRequest {
    /// Relative window ending now, e.g. `6mo` at `1d`.
    Period { period: String, interval: String },
    /// Inclusive calendar range.
    Range {
        start: NaiveDate,
        end: NaiveDate,
        interval: String,
    },
}

impl HistoryRequest {
    pub fn period(period: &str, interval: &str) -> Self {
        Self::Period {
            period: period.to_string(),
            interval: interval.to_string(),
        }
    }

    pub fn interval(&self) -> &str {
        match self {
            Self::Period { interval, .. } | Self::Range { interval, .. } => interval,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Http(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Provider error: {0}")]
    Api(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// Source of daily (or intraday) OHLCV bars.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Bars in ascending date order. An unknown symbol yields an empty list
    /// or an error, depending on the provider.
    async fn fetch(&self, symbol: &str, request: &HistoryRequest)
        -> Result<Vec<Bar>, ProviderError>;
}

/// Fetch with an upper bound on wall time.
pub async fn fetch_with_timeout(
    provider: &dyn PriceHistoryProvider,
    symbol: &str,
    request: &HistoryRequest,
    timeout: Duration,
) -> Result<Vec<Bar>, ProviderError> {
    match tokio::time::timeout(timeout, provider.fetch(symbol, request)).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(timeout)),
    }
}
