//! Moving Average Convergence Divergence (MACD) indicator.

use super::rolling::{ewm, lift};
use super::Indicator;
use crate::types::{Column, IndicatorKind, Series};

/// MACD indicator.
///
/// - `MACD`: fast EMA minus slow EMA of the close
/// - `MACD_signal`: EMA of the MACD line
/// - `MACD_histogram`: MACD minus its signal line
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self { fast, slow, signal }
    }
}

impl Indicator for Macd {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Macd
    }

    fn name(&self) -> &str {
        "MACD"
    }

    fn compute(&self, series: &Series) -> Vec<(String, Column)> {
        let closes = lift(&series.closes());
        let fast = ewm(&closes, self.fast);
        let slow = ewm(&closes, self.slow);

        let macd: Column = fast
            .iter()
            .zip(&slow)
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();
        let signal = ewm(&macd, self.signal);
        let histogram: Column = macd
            .iter()
            .zip(&signal)
            .map(|(m, s)| Some((*m)? - (*s)?))
            .collect();

        vec![
            ("MACD".to_string(), macd),
            ("MACD_signal".to_string(), signal),
            ("MACD_histogram".to_string(), histogram),
        ]
    }
}
