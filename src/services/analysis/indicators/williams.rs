//! Williams %R indicator.

use super::rolling::{lift, rolling_max, rolling_min, safe_div};
use super::Indicator;
use crate::types::{Column, IndicatorKind, Series};

/// Williams %R: where the close sits below the rolling high, from 0 (at the
/// high) to -100 (at the low).
pub struct WilliamsR {
    window: usize,
}

impl Default for WilliamsR {
    fn default() -> Self {
        Self { window: 14 }
    }
}

impl WilliamsR {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl Indicator for WilliamsR {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Williams
    }

    fn name(&self) -> &str {
        "Williams %R"
    }

    fn compute(&self, series: &Series) -> Vec<(String, Column)> {
        let closes = series.closes();
        let lowest = rolling_min(&lift(&series.lows()), self.window);
        let highest = rolling_max(&lift(&series.highs()), self.window);

        let wr = (0..closes.len())
            .map(|i| {
                let (low, high) = (lowest[i]?, highest[i]?);
                safe_div(Some(high - closes[i]), Some(high - low)).map(|v| v * -100.0)
            })
            .collect();

        vec![("Williams_%R".to_string(), wr)]
    }
}
