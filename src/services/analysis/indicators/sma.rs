//! Simple Moving Average (SMA) indicator.

use super::rolling::{lift, rolling_mean};
use super::Indicator;
use crate::types::{Column, IndicatorKind, Series};

/// SMA (Simple Moving Average) indicator.
///
/// Arithmetic mean of the last `window` closes, written to `SMA_{window}`.
pub struct Sma {
    window: usize,
}

impl Default for Sma {
    fn default() -> Self {
        Self { window: 20 }
    }
}

impl Sma {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn column_name(&self) -> String {
        format!("SMA_{}", self.window)
    }
}

impl Indicator for Sma {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Sma
    }

    fn name(&self) -> &str {
        "SMA"
    }

    fn compute(&self, series: &Series) -> Vec<(String, Column)> {
        let closes = lift(&series.closes());
        vec![(self.column_name(), rolling_mean(&closes, self.window))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis::indicators::{assert_approx, make_series};

    #[test]
    fn test_sma_column_name() {
        assert_eq!(Sma::default().column_name(), "SMA_20");
        assert_eq!(Sma::new(14).column_name(), "SMA_14");
    }

    #[test]
    fn test_sma_insufficient_data() {
        let series = make_series(&[1.0; 19]);
        let out = Sma::default().apply(&series);
        assert!(out.has_column("SMA_20"));
        assert_eq!(out.latest("SMA_20"), None);
    }

    #[test]
    fn test_sma_last_window_mean() {
        let closes: Vec<f64> = (1..=40).map(|i| i as f64).collect();
        let out = Sma::default().apply(&make_series(&closes));
        assert_approx(out.latest("SMA_20").unwrap(), 30.5, 1e-9);
        assert_eq!(out.value("SMA_20", 18), None);
        assert_approx(out.value("SMA_20", 19).unwrap(), 10.5, 1e-9);
    }
}
