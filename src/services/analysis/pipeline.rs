//! Applies the selected indicators to a series in registry order.

use super::indicators::all_indicators;
use crate::types::{IndicatorSelection, Series};

/// Return `series` augmented with every selected indicator's columns.
///
/// Indicators run in a fixed order regardless of how the selection was
/// written, so identical input always yields identical output.
pub fn apply(series: &Series, selection: &IndicatorSelection) -> Series {
    let mut out = series.clone();
    for indicator in all_indicators() {
        if selection.contains(indicator.kind()) {
            out = indicator.apply(&out);
        }
    }
    out
}
