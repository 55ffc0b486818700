//! Stock analysis core.
//!
//! `indicators` adds columns to a [`Series`], `pipeline` applies the selected
//! ones, and `latest`, `signals` and `decision` turn the last row into an
//! [`AnalysisResult`]. Everything here is pure.

pub mod decision;
pub mod features;
pub mod indicators;
pub mod latest;
pub mod pipeline;
pub mod signals;

pub use decision::decide;
pub use features::{ClassifierFeatureAdapter, FeatureError, FeatureVector};
pub use latest::extract;
pub use signals::generate;

use thiserror::Error;

use crate::types::{AnalysisResult, IndicatorSelection, Series};

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("No data found for {0}")]
    NoData(String),
}

/// Run the selected indicators over `series` and derive signals and a
/// weighted decision from the last row.
pub fn analyze(
    symbol: &str,
    series: &Series,
    selection: &IndicatorSelection,
) -> Result<AnalysisResult, AnalysisError> {
    let symbol = symbol.to_uppercase();
    if series.is_empty() {
        return Err(AnalysisError::NoData(symbol));
    }

    let augmented = pipeline::apply(series, selection);
    let latest = extract(&augmented);
    let signals = generate(&latest);
    let final_decision = decide(&signals);

    Ok(AnalysisResult {
        symbol,
        latest,
        signals,
        final_decision,
        ai: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SignalDirection;
    use crate::services::analysis::indicators::make_series;

    #[test]
    fn test_empty_series_is_no_data() {
        let err = analyze("aapl", &make_series(&[]), &IndicatorSelection::default_set());
        assert_eq!(err, Err(AnalysisError::NoData("AAPL".into())));
        assert_eq!(
            AnalysisError::NoData("AAPL".into()).to_string(),
            "No data found for AAPL"
        );
    }

    #[test]
    fn test_symbol_uppercased() {
        let result = analyze("msft", &make_series(&[1.0]), &IndicatorSelection::default_set())
            .unwrap();
        assert_eq!(result.symbol, "MSFT");
        assert!(result.ai.is_none());
    }

    #[test]
    fn test_single_bar_neutral() {
        let result = analyze("x", &make_series(&[5.0]), &IndicatorSelection::default_set())
            .unwrap();
        // EMA and MACD are seeded on the first bar; nothing windowed is defined.
        assert_eq!(result.latest.get("close"), Some(5.0));
        assert_eq!(result.latest.get("ema"), Some(5.0));
        assert!(!result.latest.contains("sma"));
        assert_eq!(result.signals.get("ema"), Some(SignalDirection::Neutral));
        assert_eq!(result.final_decision.signal, SignalDirection::Neutral);
    }
}
