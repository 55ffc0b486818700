//! Rolling z-score of the close.

use super::rolling::{lift, rolling_mean, rolling_std, safe_div};
use super::Indicator;
use crate::types::{Column, IndicatorKind, Series};

/// Distance of the close from its rolling mean, in sample standard deviations.
/// Undefined when the window has zero spread.
pub struct ZScore {
    window: usize,
}

impl Default for ZScore {
    fn default() -> Self {
        Self { window: 20 }
    }
}

impl ZScore {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl Indicator for ZScore {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::ZScore
    }

    fn name(&self) -> &str {
        "Z-Score"
    }

    fn compute(&self, series: &Series) -> Vec<(String, Column)> {
        let closes = lift(&series.closes());
        let mean = rolling_mean(&closes, self.window);
        let std = rolling_std(&closes, self.window);

        let z = closes
            .iter()
            .zip(mean.iter().zip(&std))
            .map(|(c, (m, s))| {
                let diff = Some((*c)? - (*m)?);
                safe_div(diff, *s)
            })
            .collect();

        vec![("Z_Score".to_string(), z)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis::indicators::{assert_approx, make_series};

    #[test]
    fn test_zscore_constant_series_undefined() {
        let out = ZScore::default().apply(&make_series(&[10.0; 25]));
        assert_eq!(out.latest("Z_Score"), None);
    }

    #[test]
    fn test_zscore_flat_fractional_prices_undefined() {
        for price in [101.37, 0.1, 47.83, 3.3] {
            let out = ZScore::default().apply(&make_series(&[price; 30]));
            assert_eq!(out.latest("Z_Score"), None, "price {}", price);
        }
    }

    #[test]
    fn test_zscore_linear_ramp() {
        let closes: Vec<f64> = (1..=40).map(|i| i as f64).collect();
        let out = ZScore::default().apply(&make_series(&closes));
        // (40 - 30.5) / sqrt(35)
        assert_approx(out.latest("Z_Score").unwrap(), 9.5 / 35f64.sqrt(), 1e-9);
    }

    #[test]
    fn test_zscore_warmup() {
        let closes: Vec<f64> = (1..=40).map(|i| i as f64).collect();
        let out = ZScore::default().apply(&make_series(&closes));
        assert_eq!(out.value("Z_Score", 18), None);
        assert!(out.value("Z_Score", 19).is_some());
    }
}
