//! Technical indicator implementations.
//!
//! Each indicator reads a [`Series`] and returns it with one or more new
//! columns. Existing columns are never modified.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod cci;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rolling;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod williams;
pub mod zscore;

pub use adx::Adx;
pub use atr::Atr;
pub use bollinger::BollingerBands;
pub use cci::Cci;
pub use ema::Ema;
pub use macd::Macd;
pub use obv::Obv;
pub use rsi::Rsi;
pub use sma::Sma;
pub use stochastic::Stochastic;
pub use williams::WilliamsR;
pub use zscore::ZScore;

use crate::types::{Column, IndicatorKind, Series};

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Which selection identifier enables this indicator.
    fn kind(&self) -> IndicatorKind;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Compute the new columns for `series`, each with one cell per bar.
    fn compute(&self, series: &Series) -> Vec<(String, Column)>;

    /// Return `series` augmented with this indicator's columns.
    fn apply(&self, series: &Series) -> Series {
        let mut next = series.clone();
        for (name, column) in self.compute(series) {
            next.insert_column(&name, column);
        }
        next
    }
}

/// Build the indicator for `kind` with its default parameters.
pub fn default_indicator(kind: IndicatorKind) -> Box<dyn Indicator> {
    match kind {
        IndicatorKind::Sma => Box::new(Sma::default()),
        IndicatorKind::Ema => Box::new(Ema::default()),
        IndicatorKind::Rsi => Box::new(Rsi::default()),
        IndicatorKind::Macd => Box::new(Macd::default()),
        IndicatorKind::ZScore => Box::new(ZScore::default()),
        IndicatorKind::Bollinger => Box::new(BollingerBands::default()),
        IndicatorKind::Cci => Box::new(Cci::default()),
        IndicatorKind::Adx => Box::new(Adx::default()),
        IndicatorKind::Stochastic => Box::new(Stochastic::default()),
        IndicatorKind::Williams => Box::new(WilliamsR::default()),
        IndicatorKind::Obv => Box::new(Obv),
        IndicatorKind::Atr => Box::new(Atr::default()),
    }
}

/// All indicators with default parameters, in application order.
pub fn all_indicators() -> Vec<Box<dyn Indicator>> {
    IndicatorKind::ALL
        .into_iter()
        .map(default_indicator)
        .collect()
}

/// Create a series from close prices for testing.
///
/// open = previous close, high = max(open, close) + 1, low = min(open, close) - 1,
/// volume = 1000.
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> Series {
    use crate::types::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect();
    Series::new(bars)
}

/// Assert two f64 values are approximately equal.
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, epsilon={epsilon}"
    );
}
