//! Bollinger Bands indicator.

use super::rolling::{lift, rolling_mean, rolling_std};
use super::Indicator;
use crate::types::{Column, IndicatorKind, Series};

/// Bollinger Bands.
///
/// Mid band is the rolling mean of the close; upper and lower bands sit
/// `num_std` sample standard deviations away.
pub struct BollingerBands {
    window: usize,
    num_std: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            window: 20,
            num_std: 2.0,
        }
    }
}

impl BollingerBands {
    pub fn new(window: usize, num_std: f64) -> Self {
        Self { window, num_std }
    }
}

impl Indicator for BollingerBands {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Bollinger
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }

    fn compute(&self, series: &Series) -> Vec<(String, Column)> {
        let closes = lift(&series.closes());
        let mid = rolling_mean(&closes, self.window);
        let std = rolling_std(&closes, self.window);

        let band = |sign: f64| -> Column {
            mid.iter()
                .zip(&std)
                .map(|(m, s)| Some((*m)? + sign * self.num_std * (*s)?))
                .collect()
        };
        let upper = band(1.0);
        let lower = band(-1.0);

        vec![
            ("Bollinger_Mid".to_string(), mid),
            ("Bollinger_Upper".to_string(), upper),
            ("Bollinger_Lower".to_string(), lower),
        ]
    }
}
