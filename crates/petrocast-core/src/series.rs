//! Series and panel data model.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{ForecastError, Result};

/// One named monthly indicator: date-ordered observations with gaps.
///
/// A fetch failure is represented as an empty series, never as an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(NaiveDate, Option<f64>)>,
}

impl Series {
    /// Create an empty series for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }

    /// Create a series from unordered points; they are sorted by date.
    pub fn with_points(name: impl Into<String>, points: Vec<(NaiveDate, Option<f64>)>) -> Self {
        let mut series = Self {
            name: name.into(),
            points,
        };
        series.sort_by_date();
        series
    }

    pub fn push(&mut self, date: NaiveDate, value: Option<f64>) {
        self.points.push((date, value));
    }

    pub fn sort_by_date(&mut self) {
        self.points.sort_by_key(|(date, _)| *date);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One column of a panel, aligned to the panel's date index.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// The aligned multi-indicator monthly table.
///
/// Rows are unique dates in ascending order; every column holds exactly one
/// value slot per row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Panel {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<Column>,
}

impl Panel {
    /// Outer-join a set of series on date.
    ///
    /// Every date present in any input appears exactly once, ascending.
    /// Indicators without an observation at a date receive a missing value,
    /// so an empty series contributes an entirely-missing column. Column
    /// order follows input order; column name is the series name.
    pub fn align(series_list: &[Series]) -> Panel {
        let mut calendar: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for series in series_list {
            for (date, _) in &series.points {
                calendar.entry(*date).or_default();
            }
        }
        for (row, slot) in calendar.values_mut().enumerate() {
            *slot = row;
        }

        let dates: Vec<NaiveDate> = calendar.keys().copied().collect();
        let columns = series_list
            .iter()
            .map(|series| {
                let mut values = vec![None; dates.len()];
                for (date, value) in &series.points {
                    if let Some(&row) = calendar.get(date) {
                        values[row] = *value;
                    }
                }
                Column {
                    name: series.name.clone(),
                    values,
                }
            })
            .collect();

        Panel { dates, columns }
    }

    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Remove a column; returns whether it was present.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let before = self.columns.len();
        self.columns.retain(|c| c.name != name);
        self.columns.len() != before
    }

    /// Dates and values of the non-missing observations in `name`.
    ///
    /// Fails with `SchemaMismatch` if the column is absent.
    pub fn observed(&self, name: &str) -> Result<(Vec<NaiveDate>, Vec<f64>)> {
        let column = self
            .column(name)
            .ok_or_else(|| ForecastError::SchemaMismatch(name.to_string()))?;
        let mut dates = Vec::new();
        let mut values = Vec::new();
        for (date, value) in self.dates.iter().zip(&column.values) {
            if let Some(v) = value {
                dates.push(*date);
                values.push(*v);
            }
        }
        Ok((dates, values))
    }

    /// Keep only the rows where `keep` is true, across dates and all columns.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.dates.len());
        let mut row = 0;
        self.dates.retain(|_| {
            let kept = keep[row];
            row += 1;
            kept
        });
        for column in &mut self.columns {
            let mut row = 0;
            column.values.retain(|_| {
                let kept = keep[row];
                row += 1;
                kept
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_align_outer_join() {
        let a = Series::with_points(
            "A",
            vec![(date(2020, 1), Some(1.0)), (date(2020, 2), Some(2.0))],
        );
        let b = Series::with_points(
            "B",
            vec![(date(2020, 2), Some(20.0)), (date(2020, 3), Some(30.0))],
        );

        let panel = Panel::align(&[a, b]);

        assert_eq!(panel.dates, vec![date(2020, 1), date(2020, 2), date(2020, 3)]);
        assert_eq!(panel.columns[0].name, "A");
        assert_eq!(panel.columns[0].values, vec![Some(1.0), Some(2.0), None]);
        assert_eq!(panel.columns[1].name, "B");
        assert_eq!(panel.columns[1].values, vec![None, Some(20.0), Some(30.0)]);
    }

    #[test]
    fn test_align_empty_series_yields_missing_column() {
        let a = Series::with_points("A", vec![(date(2020, 1), Some(1.0))]);
        let failed = Series::new("B");

        let panel = Panel::align(&[a, failed]);

        assert_eq!(panel.n_cols(), 2);
        assert_eq!(panel.columns[1].values, vec![None]);
    }

    #[test]
    fn test_align_sorts_unordered_input() {
        let a = Series::with_points(
            "A",
            vec![(date(2020, 3), Some(3.0)), (date(2020, 1), Some(1.0))],
        );
        let panel = Panel::align(&[a]);
        assert_eq!(panel.dates, vec![date(2020, 1), date(2020, 3)]);
        assert_eq!(panel.columns[0].values, vec![Some(1.0), Some(3.0)]);
    }

    #[test]
    fn test_observed_skips_gaps() {
        let a = Series::with_points(
            "A",
            vec![
                (date(2020, 1), Some(1.0)),
                (date(2020, 2), None),
                (date(2020, 3), Some(3.0)),
            ],
        );
        let panel = Panel::align(&[a]);
        let (dates, values) = panel.observed("A").unwrap();
        assert_eq!(dates, vec![date(2020, 1), date(2020, 3)]);
        assert_eq!(values, vec![1.0, 3.0]);
    }

    #[test]
    fn test_observed_unknown_column() {
        let panel = Panel::align(&[Series::new("A")]);
        assert!(matches!(
            panel.observed("MISSING"),
            Err(ForecastError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_drop_column() {
        let mut panel = Panel::align(&[Series::new("A"), Series::new("B")]);
        assert!(panel.drop_column("B"));
        assert!(!panel.drop_column("B"));
        assert_eq!(panel.n_cols(), 1);
    }
}
