//! Exponential Moving Average (EMA) indicator.

use super::rolling::{ewm, lift};
use super::Indicator;
use crate::types::{Column, IndicatorKind, Series};

/// EMA (Exponential Moving Average) indicator.
///
/// Like SMA but gives more weight to recent prices. Uses
/// `alpha = 2 / (window + 1)` seeded with the first close, so every bar has
/// a value.
pub struct Ema {
    window: usize,
}

impl Default for Ema {
    fn default() -> Self {
        Self { window: 20 }
    }
}

impl Ema {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn column_name(&self) -> String {
        format!("EMA_{}", self.window)
    }
}

impl Indicator for Ema {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Ema
    }

    fn name(&self) -> &str {
        "EMA"
    }

    fn compute(&self, series: &Series) -> Vec<(String, Column)> {
        let closes = lift(&series.closes());
        vec![(self.column_name(), ewm(&closes, self.window))]
    }
}
