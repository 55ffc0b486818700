use serde::{Deserialize, Serialize};

/// A persisted analysis, as returned by the history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: i64,
    pub username: String,
    pub symbol: String,
    /// Indicator identifiers joined with commas (e.g. `"sma,ema,rsi"`).
    pub indicators: String,
    /// Stored analysis JSON; `None` if the stored blob is empty or unreadable.
    pub result: Option<serde_json::Value>,
    /// Unix timestamp (milliseconds) when saved.
    pub created_at: i64,
}

/// Entry in the company symbol/name directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub symbol: String,
    pub name: String,
}
