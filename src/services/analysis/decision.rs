//! Weighted vote over per-indicator signals.

use super::latest::round_to;
use crate::types::{Decision, SignalDirection, SignalMap};

/// Vote weight for a signal label. Unlisted labels count once.
pub fn weight_for(label: &str) -> f64 {
    match label {
        "macd" => 1.5,
        "sma" | "ema" | "rsi" => 1.0,
        "z_score" => 0.7,
        "bollinger" => 0.8,
        _ => 1.0,
    }
}

/// Combine signals into a single decision.
///
/// Neutral votes carry no weight. A tie between non-zero Buy and Sell totals
/// is reported as Neutral with confidence 0.5.
pub fn decide(signals: &SignalMap) -> Decision {
    let mut buy = 0.0;
    let mut sell = 0.0;
    for (label, direction) in signals.iter() {
        match direction {
            SignalDirection::Buy => buy += weight_for(label),
            SignalDirection::Sell => sell += weight_for(label),
            SignalDirection::Neutral => {}
        }
    }

    let total = buy + sell;
    if total == 0.0 {
        return Decision::neutral();
    }

    if buy > sell {
        Decision {
            signal: SignalDirection::Buy,
            confidence: round_to(buy / total, 2),
        }
    } else if sell > buy {
        Decision {
            signal: SignalDirection::Sell,
            confidence: round_to(sell / total, 2),
        }
    } else {
        Decision {
            signal: SignalDirection::Neutral,
            confidence: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SignalDirection::*;

    fn signals(pairs: &[(&str, SignalDirection)]) -> SignalMap {
        pairs.iter().map(|(l, d)| (l.to_string(), *d)).collect()
    }

    #[test]
    fn test_no_signals_is_neutral_zero() {
        let d = decide(&SignalMap::new());
        assert_eq!(d.signal, Neutral);
        assert_eq!(d.confidence, 0.0);
    }

    #[test]
    fn test_all_neutral_is_neutral_zero() {
        let d = decide(&signals(&[("sma", Neutral), ("macd", Neutral)]));
        assert_eq!(d, Decision::neutral());
    }

    #[test]
    fn test_weighted_majority() {
        // buy = 1.5, sell = 1.0 + 0.8
        let d = decide(&signals(&[("macd", Buy), ("sma", Sell), ("bollinger", Sell)]));
        assert_eq!(d.signal, Sell);
        assert_eq!(d.confidence, 0.55);
    }

    #[test]
    fn test_tie_is_neutral_half() {
        let d = decide(&signals(&[("sma", Buy), ("ema", Sell)]));
        assert_eq!(d.signal, Neutral);
        assert_eq!(d.confidence, 0.5);
    }

    #[test]
    fn test_unanimous_sell() {
        let d = decide(&signals(&[("sma", Sell), ("rsi", Sell)]));
        assert_eq!(d.signal, Sell);
        assert_eq!(d.confidence, 1.0);
    }

    #[test]
    fn test_confidence_half_rounds_to_even() {
        // 5 / 8 = 0.625
        let d = decide(&signals(&[
            ("sma", Buy),
            ("ema", Buy),
            ("rsi", Buy),
            ("cci", Buy),
            ("adx", Buy),
            ("stochastic", Sell),
            ("williams", Sell),
            ("obv", Sell),
        ]));
        assert_eq!(d.signal, Buy);
        assert_eq!(d.confidence, 0.62);
    }

    #[test]
    fn test_unknown_label_weight() {
        assert_eq!(weight_for("cci"), 1.0);
        let d = decide(&signals(&[("cci", Buy), ("z_score", Sell)]));
        assert_eq!(d.signal, Buy);
        assert_eq!(d.confidence, 0.59);
    }
}
