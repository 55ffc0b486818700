//! On-Balance Volume (OBV) indicator.

use super::Indicator;
use crate::types::{Column, IndicatorKind, Series};

/// OBV: running volume total, added on up closes and subtracted on down
/// closes. Starts at zero.
pub struct Obv;

impl Indicator for Obv {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Obv
    }

    fn name(&self) -> &str {
        "OBV"
    }

    fn compute(&self, series: &Series) -> Vec<(String, Column)> {
        let bars = series.bars();
        let mut total = 0.0;
        let obv = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                if i > 0 {
                    let prev = bars[i - 1].close;
                    if bar.close > prev {
                        total += bar.volume as f64;
                    } else if bar.close < prev {
                        total -= bar.volume as f64;
                    }
                }
                Some(total)
            })
            .collect();

        vec![("OBV".to_string(), obv)]
    }
}
