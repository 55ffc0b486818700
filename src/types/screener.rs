use serde::{Deserialize, Serialize};

/// Optional thresholds applied to each symbol's latest values.
/// A symbol missing the value a filter needs fails that filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenerFilter {
    pub rsi_lt: Option<f64>,
    pub macd_gt: Option<f64>,
    pub sma_lt: Option<f64>,
    pub sma_gt: Option<f64>,
}

impl ScreenerFilter {
    pub fn matches(&self, hit: &ScreenerHit) -> bool {
        let below = |value: Option<f64>, limit: Option<f64>| match limit {
            Some(limit) => value.is_some_and(|v| v < limit),
            None => true,
        };
        let above = |value: Option<f64>, limit: Option<f64>| match limit {
            Some(limit) => value.is_some_and(|v| v > limit),
            None => true,
        };

        below(hit.rsi, self.rsi_lt)
            && above(hit.macd, self.macd_gt)
            && below(hit.sma, self.sma_lt)
            && above(hit.sma, self.sma_gt)
    }
}

/// Latest values of a screened symbol, rounded to 2 dp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenerHit {
    pub symbol: String,
    pub close: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub sma: Option<f64>,
}
