//! Relative Strength Index (RSI) indicator.

use super::rolling::{lift, rolling_mean};
use super::Indicator;
use crate::types::{Column, IndicatorKind, Series};

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the trailing mean of gains to the trailing
/// mean of losses. Values range from 0-100.
///
/// Conventions for a zero average loss:
/// - gains present: RSI saturates at 100
/// - no gains either (flat window): undefined
pub struct Rsi {
    window: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { window: 14 }
    }
}

impl Rsi {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn column_name(&self) -> String {
        format!("RSI_{}", self.window)
    }

    /// Per-bar gains and losses; the first bar has neither.
    fn gains_losses(closes: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let mut gains = Vec::with_capacity(closes.len());
        let mut losses = Vec::with_capacity(closes.len());
        for i in 0..closes.len() {
            let change = if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
            gains.push(change.max(0.0));
            losses.push((-change).max(0.0));
        }
        (gains, losses)
    }

    fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
        if avg_loss == 0.0 {
            return (avg_gain > 0.0).then_some(100.0);
        }
        let rs = avg_gain / avg_loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }
}

impl Indicator for Rsi {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Rsi
    }

    fn name(&self) -> &str {
        "RSI"
    }

    fn compute(&self, series: &Series) -> Vec<(String, Column)> {
        let (gains, losses) = Self::gains_losses(&series.closes());
        let avg_gain = rolling_mean(&lift(&gains), self.window);
        let avg_loss = rolling_mean(&lift(&losses), self.window);

        let rsi = avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(g, l)| match (g, l) {
                (Some(g), Some(l)) => Self::rsi_from_averages(*g, *l),
                _ => None,
            })
            .collect();

        vec![(self.column_name(), rsi)]
    }
}
