//! Commodity Channel Index (CCI) indicator.

use super::rolling::{rolling_mean, rolling_mean_abs_dev, safe_div};
use super::Indicator;
use crate::types::{Column, IndicatorKind, Series};

/// Lambert's scaling constant.
const CCI_CONSTANT: f64 = 0.015;

/// CCI: deviation of the typical price from its rolling mean, scaled by the
/// rolling mean absolute deviation.
pub struct Cci {
    window: usize,
}

impl Default for Cci {
    fn default() -> Self {
        Self { window: 20 }
    }
}

impl Cci {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl Indicator for Cci {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Cci
    }

    fn name(&self) -> &str {
        "CCI"
    }

    fn compute(&self, series: &Series) -> Vec<(String, Column)> {
        let typical: Column = series
            .bars()
            .iter()
            .map(|b| Some((b.high + b.low + b.close) / 3.0))
            .collect();
        let mean = rolling_mean(&typical, self.window);
        let mad = rolling_mean_abs_dev(&typical, self.window);

        let cci = (0..typical.len())
            .map(|i| {
                let diff = Some(typical[i]? - mean[i]?);
                safe_div(diff, mad[i].map(|m| m * CCI_CONSTANT))
            })
            .collect();

        vec![("CCI".to_string(), cci)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis::indicators::make_series;

    #[test]
    fn test_cci_flat_series_undefined() {
        let out = Cci::default().apply(&make_series(&[10.0; 30]));
        assert_eq!(out.latest("CCI"), None);
    }

    #[test]
    fn test_cci_flat_fractional_prices_undefined() {
        for price in [101.37, 0.1, 47.83, 3.3] {
            let out = Cci::default().apply(&make_series(&[price; 30]));
            assert_eq!(out.latest("CCI"), None, "price {}", price);
        }
    }

    #[test]
    fn test_cci_uptrend_positive() {
        let closes: Vec<f64> = (1..=40).map(|i| i as f64).collect();
        let out = Cci::default().apply(&make_series(&closes));
        assert!(out.latest("CCI").unwrap() > 100.0);
    }

    #[test]
    fn test_cci_downtrend_negative() {
        let closes: Vec<f64> = (1..=40).rev().map(|i| i as f64).collect();
        let out = Cci::default().apply(&make_series(&closes));
        assert!(out.latest("CCI").unwrap() < -100.0);
    }
}
