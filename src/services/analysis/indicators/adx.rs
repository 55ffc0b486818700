//! Average Directional Index (ADX) indicator.

use super::atr::true_range;
use super::rolling::{lift, rolling_mean, safe_div};
use super::Indicator;
use crate::types::{Column, IndicatorKind, Series};

/// ADX: trend strength regardless of direction, on a 0-100 scale.
///
/// Directional movement and true range are smoothed with a trailing mean
/// (not Wilder's recursive smoothing), and ADX is the trailing mean of DX.
pub struct Adx {
    window: usize,
}

impl Default for Adx {
    fn default() -> Self {
        Self { window: 14 }
    }
}

impl Adx {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// +DM and -DM per bar; zero on the first bar.
    fn directional_movement(series: &Series) -> (Vec<f64>, Vec<f64>) {
        let bars = series.bars();
        let mut plus = vec![0.0; bars.len()];
        let mut minus = vec![0.0; bars.len()];
        for i in 1..bars.len() {
            let up = bars[i].high - bars[i - 1].high;
            let down = bars[i - 1].low - bars[i].low;
            if up > down && up > 0.0 {
                plus[i] = up;
            }
            if down > up && down > 0.0 {
                minus[i] = down;
            }
        }
        (plus, minus)
    }
}

impl Indicator for Adx {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Adx
    }

    fn name(&self) -> &str {
        "ADX"
    }

    fn compute(&self, series: &Series) -> Vec<(String, Column)> {
        let (plus_dm, minus_dm) = Self::directional_movement(series);
        let tr = rolling_mean(&lift(&true_range(series)), self.window);
        let plus_dm = rolling_mean(&lift(&plus_dm), self.window);
        let minus_dm = rolling_mean(&lift(&minus_dm), self.window);

        let dx: Column = (0..series.len())
            .map(|i| {
                let plus_di = safe_div(plus_dm[i], tr[i]).map(|v| v * 100.0);
                let minus_di = safe_div(minus_dm[i], tr[i]).map(|v| v * 100.0);
                let (p, m) = (plus_di?, minus_di?);
                safe_div(Some((p - m).abs()), Some(p + m)).map(|v| v * 100.0)
            })
            .collect();

        vec![("ADX".to_string(), rolling_mean(&dx, self.window))]
    }
}
