//! Trailing-window statistics over optional columns.
//!
//! A window yields `None` unless it holds `window` defined values.

use crate::types::Column;

/// Wrap plain values as a fully-defined column.
pub fn lift(values: &[f64]) -> Column {
    values.iter().copied().map(Some).collect()
}

/// The `window` values ending at `index`, if all are defined.
fn window_at(values: &[Option<f64>], index: usize, window: usize) -> Option<Vec<f64>> {
    if window == 0 || index + 1 < window {
        return None;
    }
    values[index + 1 - window..=index].iter().copied().collect()
}

fn rolling<F>(values: &[Option<f64>], window: usize, f: F) -> Column
where
    F: Fn(&[f64]) -> Option<f64>,
{
    (0..values.len())
        .map(|i| window_at(values, i, window).and_then(|w| f(&w)))
        .collect()
}

/// A window of identical values has exactly zero spread; the float mean of
/// such a window can be off by an ulp.
fn is_flat(w: &[f64]) -> bool {
    w.first().is_some_and(|first| w.iter().all(|x| x == first))
}

fn mean(w: &[f64]) -> f64 {
    if is_flat(w) {
        return w[0];
    }
    w.iter().sum::<f64>() / w.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
fn sample_std(w: &[f64]) -> Option<f64> {
    if w.len() < 2 {
        return None;
    }
    if is_flat(w) {
        return Some(0.0);
    }
    let m = mean(w);
    let var = w.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (w.len() - 1) as f64;
    Some(var.sqrt())
}

pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Column {
    rolling(values, window, |w| Some(mean(w)))
}

pub fn rolling_std(values: &[Option<f64>], window: usize) -> Column {
    rolling(values, window, sample_std)
}

pub fn rolling_min(values: &[Option<f64>], window: usize) -> Column {
    rolling(values, window, |w| w.iter().copied().reduce(f64::min))
}

pub fn rolling_max(values: &[Option<f64>], window: usize) -> Column {
    rolling(values, window, |w| w.iter().copied().reduce(f64::max))
}

/// Mean absolute deviation from the window mean.
pub fn rolling_mean_abs_dev(values: &[Option<f64>], window: usize) -> Column {
    rolling(values, window, |w| {
        if is_flat(w) {
            return Some(0.0);
        }
        let m = mean(w);
        Some(w.iter().map(|x| (x - m).abs()).sum::<f64>() / w.len() as f64)
    })
}

/// Exponential moving average with `alpha = 2 / (span + 1)`.
///
/// Seeded with the first defined value, no bias correction. Undefined cells
/// stay undefined and do not advance the average.
pub fn ewm(values: &[Option<f64>], span: usize) -> Column {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev: Option<f64> = None;
    values
        .iter()
        .map(|v| {
            let next = match (*v, prev) {
                (Some(x), Some(p)) => Some(x * alpha + p * (1.0 - alpha)),
                (Some(x), None) => Some(x),
                (None, _) => None,
            };
            if next.is_some() {
                prev = next;
            }
            next
        })
        .collect()
}

/// Divide cell-wise, treating a zero denominator as undefined.
pub fn safe_div(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => {
            let q = n / d;
            q.is_finite().then_some(q)
        }
        _ => None,
    }
}
