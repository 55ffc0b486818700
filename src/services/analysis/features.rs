//! Feature vector for the external classifier.
//!
//! The classifier was trained on its own column naming, so indicator output
//! is renamed before the latest row is read.

use serde::Serialize;
use thiserror::Error;

use super::pipeline;
use crate::types::{IndicatorSelection, Series};

/// Feature names in the order the classifier expects them.
pub const FEATURE_ORDER: [&str; 14] = [
    "Close",
    "SMA_14",
    "RSI_14",
    "MACD",
    "Signal",
    "Upper_BB",
    "Lower_BB",
    "CCI",
    "ADX",
    "Stochastic_K",
    "Stochastic_D",
    "Williams_%R",
    "OBV",
    "ATR",
];

/// Pipeline column to classifier feature name.
const ALIASES: [(&str, &str); 4] = [
    ("SMA_20", "SMA_14"),
    ("MACD_signal", "Signal"),
    ("Bollinger_Upper", "Upper_BB"),
    ("Bollinger_Lower", "Lower_BB"),
];

#[derive(Debug, Error, PartialEq)]
pub enum FeatureError {
    #[error("Not enough history for features: {}", .0.join(", "))]
    Missing(Vec<String>),
}

/// Latest-row features, in [`FEATURE_ORDER`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    values: Vec<(String, f64)>,
}

impl FeatureVector {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// JSON object `{name: value, ...}`.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .values
            .iter()
            .map(|(n, v)| (n.clone(), serde_json::json!(v)))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

/// Builds classifier features from price bars.
///
/// Always computes every indicator, whatever the caller selected for its own
/// analysis.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassifierFeatureAdapter;

impl ClassifierFeatureAdapter {
    /// Full indicator set with the classifier's column names added.
    pub fn prepare(&self, series: &Series) -> Series {
        let mut out = pipeline::apply(series, &IndicatorSelection::all());
        for (column, alias) in ALIASES {
            if let Some(values) = out.column(column).map(<[Option<f64>]>::to_vec) {
                out = out.with_column(alias, values);
            }
        }
        out
    }

    pub fn features(&self, series: &Series) -> Result<FeatureVector, FeatureError> {
        let prepared = self.prepare(series);
        let mut values = Vec::with_capacity(FEATURE_ORDER.len());
        let mut missing = Vec::new();
        for name in FEATURE_ORDER {
            match prepared.latest(name) {
                Some(v) => values.push((name.to_string(), v)),
                None => missing.push(name.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(FeatureError::Missing(missing));
        }
        Ok(FeatureVector { values })
    }
}
