use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the price table with the core indicators, all defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "SMA_20")]
    pub sma_20: f64,
    #[serde(rename = "EMA_20")]
    pub ema_20: f64,
    #[serde(rename = "RSI_14")]
    pub rsi_14: f64,
    #[serde(rename = "MACD")]
    pub macd: f64,
    #[serde(rename = "MACD_signal")]
    pub macd_signal: f64,
}

/// Close price with its 20-day mean and Bollinger bands for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub sma: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_lower: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub symbol: String,
    pub points: Vec<ChartPoint>,
}
