use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One daily OHLCV observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// A column of per-bar values. `None` marks an undefined cell.
pub type Column = Vec<Option<f64>>;

/// Price bars plus derived indicator columns.
///
/// Every derived column has exactly one cell per bar. Bar fields are
/// addressable as the columns `Open`, `High`, `Low`, `Close` and `Volume`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    bars: Vec<Bar>,
    columns: BTreeMap<String, Column>,
}

impl Series {
    /// Build a series from bars, sorting by date and dropping duplicate dates.
    pub fn new(mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Self {
            bars,
            columns: BTreeMap::new(),
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Whether a bar field or derived column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        is_bar_field(name) || self.columns.contains_key(name)
    }

    /// Derived column by name. Bar fields are not returned here.
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns.get(name).map(|c| c.as_slice())
    }

    /// Names of the derived columns, sorted.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    /// Value of a bar field or derived column at `index`.
    pub fn value(&self, name: &str, index: usize) -> Option<f64> {
        if is_bar_field(name) {
            return self.bars.get(index).and_then(|bar| bar_field(bar, name));
        }
        self.columns.get(name)?.get(index).copied().flatten()
    }

    /// Value of a bar field or derived column in the last row.
    pub fn latest(&self, name: &str) -> Option<f64> {
        let last = self.len().checked_sub(1)?;
        self.value(name, last)
    }

    /// Return a copy of this series with `column` added under `name`.
    ///
    /// Bar fields and existing columns are left untouched; a column that does
    /// not match the bar count is rejected.
    pub fn with_column(&self, name: &str, column: Column) -> Self {
        let mut next = self.clone();
        next.insert_column(name, column);
        next
    }

    pub(crate) fn insert_column(&mut self, name: &str, column: Column) {
        if column.len() != self.bars.len() || is_bar_field(name) {
            tracing::warn!(
                "Rejected column {} ({} cells for {} bars)",
                name,
                column.len(),
                self.bars.len()
            );
            return;
        }
        self.columns.entry(name.to_string()).or_insert(column);
    }
}

fn is_bar_field(name: &str) -> bool {
    matches!(name, "Open" | "High" | "Low" | "Close" | "Volume")
}

fn bar_field(bar: &Bar, name: &str) -> Option<f64> {
    match name {
        "Open" => Some(bar.open),
        "High" => Some(bar.high),
        "Low" => Some(bar.low),
        "Close" => Some(bar.close),
        "Volume" => Some(bar.volume as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 100,
        }
    }

    #[test]
    fn test_new_sorts_and_dedups() {
        let series = Series::new(vec![bar(3, 3.0), bar(1, 1.0), bar(3, 9.0), bar(2, 2.0)]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_bar_fields_are_columns() {
        let series = Series::new(vec![bar(1, 10.0), bar(2, 11.0)]);
        assert!(series.has_column("Close"));
        assert_eq!(series.latest("Close"), Some(11.0));
        assert_eq!(series.latest("High"), Some(12.0));
        assert_eq!(series.latest("Volume"), Some(100.0));
        assert!(!series.has_column("SMA_20"));
    }

    #[test]
    fn test_with_column_does_not_mutate_original() {
        let series = Series::new(vec![bar(1, 10.0), bar(2, 11.0)]);
        let augmented = series.with_column("X", vec![None, Some(1.0)]);
        assert!(!series.has_column("X"));
        assert_eq!(augmented.latest("X"), Some(1.0));
        assert_eq!(augmented.value("X", 0), None);
    }

    #[test]
    fn test_with_column_rejects_length_mismatch() {
        let series = Series::new(vec![bar(1, 10.0), bar(2, 11.0)]);
        let augmented = series.with_column("X", vec![Some(1.0)]);
        assert!(!augmented.has_column("X"));
    }

    #[test]
    fn test_existing_column_is_not_overwritten() {
        let series = Series::new(vec![bar(1, 10.0)]).with_column("X", vec![Some(1.0)]);
        let again = series.with_column("X", vec![Some(2.0)]);
        assert_eq!(again.latest("X"), Some(1.0));
    }

    #[test]
    fn test_latest_on_empty_series() {
        let series = Series::new(Vec::new());
        assert!(series.is_empty());
        assert_eq!(series.latest("Close"), None);
    }
}
