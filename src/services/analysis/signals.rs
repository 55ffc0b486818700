//! Rule-based Buy/Sell/Neutral signals from latest values.

use crate::types::{LatestValues, SignalDirection, SignalMap};

/// RSI strictly below this reads as oversold.
const RSI_OVERSOLD: f64 = 35.0;
/// RSI strictly above this reads as overbought.
const RSI_OVERBOUGHT: f64 = 65.0;
const Z_SCORE_BAND: f64 = 2.0;

/// Buy when `value` is below `reference`, Sell when above.
fn mean_reversion(value: f64, reference: f64) -> SignalDirection {
    if value < reference {
        SignalDirection::Buy
    } else if value > reference {
        SignalDirection::Sell
    } else {
        SignalDirection::Neutral
    }
}

fn thresholds(value: f64, buy_below: f64, sell_above: f64) -> SignalDirection {
    if value < buy_below {
        SignalDirection::Buy
    } else if value > sell_above {
        SignalDirection::Sell
    } else {
        SignalDirection::Neutral
    }
}

/// Derive one signal per indicator whose inputs are all present.
pub fn generate(latest: &LatestValues) -> SignalMap {
    let mut signals = SignalMap::new();

    if let (Some(macd), Some(signal)) = (latest.get("macd"), latest.get("macd_signal")) {
        let direction = if macd > signal {
            SignalDirection::Buy
        } else if macd < signal {
            SignalDirection::Sell
        } else {
            SignalDirection::Neutral
        };
        signals.insert("macd", direction);
    }

    let close = latest.get("close");
    if let (Some(close), Some(sma)) = (close, latest.get("sma")) {
        signals.insert("sma", mean_reversion(close, sma));
    }
    if let (Some(close), Some(ema)) = (close, latest.get("ema")) {
        signals.insert("ema", mean_reversion(close, ema));
    }

    if let Some(rsi) = latest.get("rsi") {
        signals.insert("rsi", thresholds(rsi, RSI_OVERSOLD, RSI_OVERBOUGHT));
    }

    if let Some(z) = latest.get("z_score") {
        signals.insert("z_score", thresholds(z, -Z_SCORE_BAND, Z_SCORE_BAND));
    }

    if let (Some(close), Some(upper), Some(lower)) = (
        close,
        latest.get("bollinger_upper"),
        latest.get("bollinger_lower"),
    ) {
        signals.insert("bollinger", thresholds(close, lower, upper));
    }

    signals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SignalDirection::*;

    fn latest(pairs: &[(&str, f64)]) -> LatestValues {
        let mut out = LatestValues::new();
        for (k, v) in pairs {
            out.insert(k, *v);
        }
        out
    }

    #[test]
    fn test_macd_cross() {
        let s = generate(&latest(&[("macd", 1.2), ("macd_signal", 1.0)]));
        assert_eq!(s.get("macd"), Some(Buy));
        let s = generate(&latest(&[("macd", 0.8), ("macd_signal", 1.0)]));
        assert_eq!(s.get("macd"), Some(Sell));
        let s = generate(&latest(&[("macd", 1.0), ("macd_signal", 1.0)]));
        assert_eq!(s.get("macd"), Some(Neutral));
    }

    #[test]
    fn test_price_below_average_is_buy() {
        let s = generate(&latest(&[("close", 9.0), ("sma", 10.0), ("ema", 8.0)]));
        assert_eq!(s.get("sma"), Some(Buy));
        assert_eq!(s.get("ema"), Some(Sell));
    }

    #[test]
    fn test_rsi_thresholds_are_strict() {
        let s = generate(&latest(&[("rsi", 35.0)]));
        assert_eq!(s.get("rsi"), Some(Neutral));
        let s = generate(&latest(&[("rsi", 34.99)]));
        assert_eq!(s.get("rsi"), Some(Buy));
        let s = generate(&latest(&[("rsi", 65.01)]));
        assert_eq!(s.get("rsi"), Some(Sell));
    }

    #[test]
    fn test_z_score_and_bollinger() {
        let s = generate(&latest(&[
            ("close", 50.0),
            ("z_score", 2.5),
            ("bollinger_upper", 45.0),
            ("bollinger_lower", 30.0),
        ]));
        assert_eq!(s.get("z_score"), Some(Sell));
        assert_eq!(s.get("bollinger"), Some(Sell));
    }

    #[test]
    fn test_missing_inputs_omit_signal() {
        let s = generate(&latest(&[("close", 10.0), ("macd", 0.5), ("bollinger_upper", 12.0)]));
        assert!(s.is_empty());
    }
}
