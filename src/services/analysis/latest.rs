//! Latest-value extraction from an augmented series.

use crate::types::{LatestValues, Series};

/// Column to output label, in the order labels are reported.
const FIELD_MAP: [(&str, &str); 9] = [
    ("Close", "close"),
    ("SMA_20", "sma"),
    ("EMA_20", "ema"),
    ("RSI_14", "rsi"),
    ("MACD", "macd"),
    ("MACD_signal", "macd_signal"),
    ("Z_Score", "z_score"),
    ("Bollinger_Upper", "bollinger_upper"),
    ("Bollinger_Lower", "bollinger_lower"),
];

/// Round to `dp` decimal places, ties to even.
pub fn round_to(value: f64, dp: i32) -> f64 {
    let factor = 10f64.powi(dp);
    (value * factor).round_ties_even() / factor
}

fn precision_for(column: &str) -> i32 {
    if column.contains("MACD") {
        4
    } else {
        2
    }
}

/// Last-row values of the mapped columns that exist and are defined.
pub fn extract(series: &Series) -> LatestValues {
    let mut latest = LatestValues::new();
    if series.is_empty() {
        return latest;
    }
    for (column, label) in FIELD_MAP {
        if let Some(value) = series.latest(column) {
            latest.insert(label, round_to(value, precision_for(column)));
        }
    }
    latest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis::indicators::make_series;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(42.3321, 2), 42.33);
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(-1.005001, 2), -1.01);
    }

    #[test]
    fn test_round_to_ties_even() {
        assert_eq!(round_to(12.125, 2), 12.12);
        assert_eq!(round_to(0.625, 2), 0.62);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
    }

    #[test]
    fn test_extract_empty_series() {
        assert!(extract(&make_series(&[])).is_empty());
    }

    #[test]
    fn test_extract_close_only() {
        let latest = extract(&make_series(&[10.0, 12.346]));
        assert_eq!(latest.len(), 1);
        assert_eq!(latest.get("close"), Some(12.35));
    }

    #[test]
    fn test_extract_skips_undefined_and_rounds_macd() {
        let series = make_series(&[1.0, 2.0, 3.0])
            .with_column("MACD", vec![None, None, Some(0.123456)])
            .with_column("RSI_14", vec![None, None, None])
            .with_column("SMA_20", vec![None, Some(1.5), Some(2.0049)]);
        let latest = extract(&series);
        assert_eq!(latest.get("macd"), Some(0.1235));
        assert_eq!(latest.get("sma"), Some(2.0));
        assert!(!latest.contains("rsi"));
    }

    #[test]
    fn test_extract_ignores_unmapped_columns() {
        let series = make_series(&[1.0]).with_column("ATR", vec![Some(3.0)]);
        let latest = extract(&series);
        assert_eq!(latest.len(), 1);
    }
}
