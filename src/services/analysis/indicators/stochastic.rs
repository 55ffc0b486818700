//! Stochastic oscillator.

use super::rolling::{lift, rolling_max, rolling_mean, rolling_min, safe_div};
use super::Indicator;
use crate::types::{Column, IndicatorKind, Series};

/// Stochastic oscillator.
///
/// `%K` places the close inside the rolling high/low range (0-100);
/// `%D` is the rolling mean of `%K`.
pub struct Stochastic {
    k_window: usize,
    d_window: usize,
}

impl Default for Stochastic {
    fn default() -> Self {
        Self {
            k_window: 14,
            d_window: 3,
        }
    }
}

impl Stochastic {
    pub fn new(k_window: usize, d_window: usize) -> Self {
        Self { k_window, d_window }
    }
}

impl Indicator for Stochastic {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Stochastic
    }

    fn name(&self) -> &str {
        "Stochastic"
    }

    fn compute(&self, series: &Series) -> Vec<(String, Column)> {
        let closes = series.closes();
        let lowest = rolling_min(&lift(&series.lows()), self.k_window);
        let highest = rolling_max(&lift(&series.highs()), self.k_window);

        let k: Column = (0..closes.len())
            .map(|i| {
                let (low, high) = (lowest[i]?, highest[i]?);
                safe_div(Some(closes[i] - low), Some(high - low)).map(|v| v * 100.0)
            })
            .collect();
        let d = rolling_mean(&k, self.d_window);

        vec![("Stochastic_K".to_string(), k), ("Stochastic_D".to_string(), d)]
    }
}
