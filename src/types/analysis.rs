use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Indicator families known to the pipeline, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Macd,
    ZScore,
    Bollinger,
    Cci,
    Adx,
    Stochastic,
    Williams,
    Obv,
    Atr,
}

impl IndicatorKind {
    /// Every indicator, in the order the pipeline applies them.
    pub const ALL: [IndicatorKind; 12] = [
        IndicatorKind::Sma,
        IndicatorKind::Ema,
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
        IndicatorKind::ZScore,
        IndicatorKind::Bollinger,
        IndicatorKind::Cci,
        IndicatorKind::Adx,
        IndicatorKind::Stochastic,
        IndicatorKind::Williams,
        IndicatorKind::Obv,
        IndicatorKind::Atr,
    ];

    /// Selection used when a request names no indicators.
    pub const DEFAULT: [IndicatorKind; 6] = [
        IndicatorKind::Sma,
        IndicatorKind::Ema,
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
        IndicatorKind::ZScore,
        IndicatorKind::Bollinger,
    ];

    /// Parse a case-sensitive identifier.
    pub fn from_id(s: &str) -> Option<Self> {
        match s {
            "sma" => Some(Self::Sma),
            "ema" => Some(Self::Ema),
            "rsi" => Some(Self::Rsi),
            "macd" => Some(Self::Macd),
            "z_score" => Some(Self::ZScore),
            "bollinger" => Some(Self::Bollinger),
            "cci" => Some(Self::Cci),
            "adx" => Some(Self::Adx),
            "stochastic" => Some(Self::Stochastic),
            "williams" => Some(Self::Williams),
            "obv" => Some(Self::Obv),
            "atr" => Some(Self::Atr),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Sma => "sma",
            Self::Ema => "ema",
            Self::Rsi => "rsi",
            Self::Macd => "macd",
            Self::ZScore => "z_score",
            Self::Bollinger => "bollinger",
            Self::Cci => "cci",
            Self::Adx => "adx",
            Self::Stochastic => "stochastic",
            Self::Williams => "williams",
            Self::Obv => "obv",
            Self::Atr => "atr",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Set of indicators requested for one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndicatorSelection {
    kinds: BTreeSet<IndicatorKind>,
}

impl IndicatorSelection {
    /// Resolve requested identifiers.
    ///
    /// An empty request falls back to [`IndicatorKind::DEFAULT`]. Unknown
    /// identifiers are ignored, so a request made only of unknown names
    /// selects nothing.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let requested: Vec<S> = names.into_iter().collect();
        if requested.is_empty() {
            return Self::default_set();
        }
        Self {
            kinds: requested
                .iter()
                .filter_map(|n| IndicatorKind::from_id(n.as_ref().trim()))
                .collect(),
        }
    }

    /// Parse a comma-separated query value such as `"sma,rsi"`.
    pub fn from_csv(value: Option<&str>) -> Self {
        let names: Vec<&str> = value
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        Self::from_names(names)
    }

    pub fn default_set() -> Self {
        Self {
            kinds: IndicatorKind::DEFAULT.into_iter().collect(),
        }
    }

    pub fn all() -> Self {
        Self {
            kinds: IndicatorKind::ALL.into_iter().collect(),
        }
    }

    pub fn contains(&self, kind: IndicatorKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Selected kinds in pipeline order.
    pub fn iter(&self) -> impl Iterator<Item = IndicatorKind> + '_ {
        self.kinds.iter().copied()
    }

    /// Identifiers joined with commas, as stored in analysis history.
    pub fn joined(&self) -> String {
        self.iter().map(|k| k.id()).collect::<Vec<_>>().join(",")
    }
}

/// Directional verdict of a signal or decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalDirection {
    Buy,
    Sell,
    Neutral,
}

impl SignalDirection {
    pub fn label(&self) -> &'static str {
        match self {
            SignalDirection::Buy => "Buy",
            SignalDirection::Sell => "Sell",
            SignalDirection::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rounded latest indicator values keyed by output label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LatestValues(BTreeMap<String, f64>);

impl LatestValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: &str, value: f64) {
        self.0.insert(label.to_string(), value);
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Per-indicator signals keyed by indicator label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalMap(BTreeMap<String, SignalDirection>);

impl SignalMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: &str, direction: SignalDirection) {
        self.0.insert(label.to_string(), direction);
    }

    pub fn get(&self, label: &str) -> Option<SignalDirection> {
        self.0.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SignalDirection)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: AsRef<str>> FromIterator<(S, SignalDirection)> for SignalMap {
    fn from_iter<T: IntoIterator<Item = (S, SignalDirection)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.as_ref().to_string(), v))
                .collect(),
        )
    }
}

/// Weighted aggregate of all signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub signal: SignalDirection,
    /// Share of the winning side's weight, in `[0, 1]`.
    pub confidence: f64,
}

impl Decision {
    pub fn neutral() -> Self {
        Self {
            signal: SignalDirection::Neutral,
            confidence: 0.0,
        }
    }
}

/// Classifier verdict attached to an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AiVerdict {
    Prediction { signal: String, confidence: f64 },
    Failed { error: String },
}

/// Full analysis of one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub symbol: String,
    pub latest: LatestValues,
    pub signals: SignalMap,
    pub final_decision: Decision,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ai: Option<AiVerdict>,
}
