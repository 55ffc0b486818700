//! Average True Range (ATR) indicator.

use super::rolling::{lift, rolling_mean};
use super::Indicator;
use crate::types::{Column, IndicatorKind, Series};

/// True range per bar. The first bar has no previous close, so it uses
/// `high - low` alone.
pub(crate) fn true_range(series: &Series) -> Vec<f64> {
    let bars = series.bars();
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let hl = bar.high - bar.low;
            if i == 0 {
                return hl;
            }
            let prev_close = bars[i - 1].close;
            hl.max((bar.high - prev_close).abs())
                .max((bar.low - prev_close).abs())
        })
        .collect()
}

/// ATR (Average True Range): trailing mean of the true range.
pub struct Atr {
    window: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { window: 14 }
    }
}

impl Atr {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl Indicator for Atr {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Atr
    }

    fn name(&self) -> &str {
        "ATR"
    }

    fn compute(&self, series: &Series) -> Vec<(String, Column)> {
        let tr = lift(&true_range(series));
        vec![("ATR".to_string(), rolling_mean(&tr, self.window))]
    }
}
