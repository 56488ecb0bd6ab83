//! Row-major in-memory dataset.
//!
//! A [`Dataset`] is an ordered list of header names plus an ordered list of
//! rows, each row mapping header to [`Cell`]. It mirrors the JSON shape
//! `{"headers": [...], "data": [{...}, ...]}` and can be decoded from it
//! directly with [`Dataset::from_json`].
//!
//! Datasets are never mutated by the analysis functions; every operation
//! that reshapes data returns a new value.
//!
//! # Example
//!
//! ```
//! use u_statlab::dataset::{Cell, Dataset};
//!
//! let json = r#"{
//!     "headers": ["x", "label"],
//!     "data": [
//!         {"x": 1.5, "label": "a"},
//!         {"x": null, "label": "b"},
//!         {"x": 3, "label": "a"}
//!     ]
//! }"#;
//! let ds = Dataset::from_json(json).unwrap();
//! assert_eq!(ds.row_count(), 3);
//! assert_eq!(ds.numeric_column("x").unwrap(), vec![1.5, 3.0]);
//! assert_eq!(ds.cell(1, "x"), &Cell::Null);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::StatError;
use crate::resampling::SamplingMethod;

// ── Cell ──────────────────────────────────────────────────────────────

/// A single dataset value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Absent value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Real number. Non-finite numbers are kept but never aggregated.
    Number(f64),
    /// Free-form text.
    Text(String),
}

static NULL_CELL: Cell = Cell::Null;

impl Cell {
    /// Returns `true` for [`Cell::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value of a finite [`Cell::Number`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    /// Returns a finite number from a number cell or a numeric text cell.
    ///
    /// ```
    /// use u_statlab::dataset::Cell;
    ///
    /// assert_eq!(Cell::from(" 4 ").coerce_f64(), Some(4.0));
    /// assert_eq!(Cell::from("four").coerce_f64(), None);
    /// assert_eq!(Cell::Number(f64::NAN).coerce_f64(), None);
    /// ```
    pub fn coerce_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(*v),
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
            }
            _ => None,
        }
    }

    /// Returns the text of a [`Cell::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the category label used for frequency counting, or `None` for nulls.
    pub fn label(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Number(v) => Some(v.to_string()),
            Self::Text(s) => Some(s.clone()),
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<i32> for Cell {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<bool> for Cell {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

// ── Dataset ───────────────────────────────────────────────────────────

/// One dataset row: header name to cell.
pub type Row = HashMap<String, Cell>;

/// Row-major tabular data with an ordered header list.
///
/// Header names are expected to be unique and every row is expected to
/// carry every header; [`validate_dataset`](crate::validation::validate_dataset)
/// reports deviations. Missing keys read as [`Cell::Null`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Ordered header names.
    #[serde(default)]
    pub headers: Vec<String>,
    /// Rows in input order.
    #[serde(default)]
    pub data: Vec<Row>,
}

impl Dataset {
    /// Creates a dataset from headers and rows.
    pub fn new(headers: Vec<String>, data: Vec<Row>) -> Self {
        Self { headers, data }
    }

    /// Decodes a dataset from its JSON form `{"headers": [...], "data": [...]}`.
    pub fn from_json(input: &str) -> Result<Self, StatError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Builds a dataset from named columns of equal length.
    ///
    /// ```
    /// use u_statlab::dataset::{Cell, Dataset};
    ///
    /// let ds = Dataset::from_columns(vec![
    ///     ("a", vec![Cell::from(1.0), Cell::from(2.0)]),
    ///     ("b", vec![Cell::from("x"), Cell::Null]),
    /// ])
    /// .unwrap();
    /// assert_eq!(ds.headers, vec!["a", "b"]);
    /// assert_eq!(ds.row_count(), 2);
    /// ```
    pub fn from_columns(columns: Vec<(&str, Vec<Cell>)>) -> Result<Self, StatError> {
        let n_rows = columns.first().map_or(0, |(_, c)| c.len());
        let mut headers = Vec::with_capacity(columns.len());
        let mut data: Vec<Row> = (0..n_rows).map(|_| Row::new()).collect();

        for (name, cells) in columns {
            if cells.len() != n_rows {
                return Err(StatError::DimensionMismatch {
                    expected: n_rows,
                    actual: cells.len(),
                });
            }
            headers.push(name.to_string());
            for (row, cell) in data.iter_mut().zip(cells) {
                row.insert(name.to_string(), cell);
            }
        }

        Ok(Self { headers, data })
    }

    /// Returns the number of rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of headers.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Returns `true` if the dataset has a header named `name`.
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Returns the cell at (`row`, `name`), or [`Cell::Null`] when absent.
    pub fn cell(&self, row: usize, name: &str) -> &Cell {
        self.data
            .get(row)
            .and_then(|r| r.get(name))
            .unwrap_or(&NULL_CELL)
    }

    /// Projects one header across all rows, preserving row order.
    pub fn column(&self, name: &str) -> Result<Vec<&Cell>, StatError> {
        if !self.has_column(name) {
            return Err(StatError::ColumnNotFound {
                name: name.to_string(),
            });
        }
        Ok(self
            .data
            .iter()
            .map(|row| row.get(name).unwrap_or(&NULL_CELL))
            .collect())
    }

    /// Returns the finite numeric values of a column (numeric text included), nulls dropped.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, StatError> {
        Ok(self
            .column(name)?
            .into_iter()
            .filter_map(Cell::coerce_f64)
            .collect())
    }

    /// Returns a new dataset containing the rows at `indices`, in that order.
    ///
    /// Out-of-range indices are skipped.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            headers: self.headers.clone(),
            data: indices
                .iter()
                .filter_map(|&i| self.data.get(i).cloned())
                .collect(),
        }
    }

    /// Returns a `k`-row sample; see [`sample_indices`](crate::resampling::sample_indices).
    pub fn sample(&self, k: usize, method: SamplingMethod, seed: u64) -> Self {
        crate::resampling::sample_dataset(self, k, method, seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_cells() {
        let json = r#"{"headers":["a","b","c","d"],
            "data":[{"a":1,"b":"x","c":true,"d":null}]}"#;
        let ds = Dataset::from_json(json).unwrap();
        assert_eq!(ds.cell(0, "a"), &Cell::Number(1.0));
        assert_eq!(ds.cell(0, "b"), &Cell::Text("x".into()));
        assert_eq!(ds.cell(0, "c"), &Cell::Bool(true));
        assert_eq!(ds.cell(0, "d"), &Cell::Null);
    }

    #[test]
    fn missing_key_reads_as_null() {
        let json = r#"{"headers":["a","b"],"data":[{"a":1}]}"#;
        let ds = Dataset::from_json(json).unwrap();
        assert!(ds.cell(0, "b").is_null());
        assert!(ds.cell(5, "a").is_null());
        let col = ds.column("b").unwrap();
        assert_eq!(col.len(), 1);
        assert!(col[0].is_null());
    }

    #[test]
    fn invalid_json_rejected() {
        let err = Dataset::from_json("[1, 2").unwrap_err();
        assert!(matches!(err, StatError::InvalidJson(_)));
    }

    #[test]
    fn unknown_column() {
        let ds = Dataset::default();
        assert!(matches!(
            ds.column("nope"),
            Err(StatError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn numeric_column_coerces_text() {
        let ds = Dataset::from_columns(vec![(
            "x",
            vec![
                Cell::from(1.0),
                Cell::from("2.5"),
                Cell::from("n/a"),
                Cell::Null,
                Cell::from(f64::INFINITY),
            ],
        )])
        .unwrap();
        assert_eq!(ds.numeric_column("x").unwrap(), vec![1.0, 2.5]);
    }

    #[test]
    fn from_columns_length_mismatch() {
        let err = Dataset::from_columns(vec![
            ("a", vec![Cell::from(1.0)]),
            ("b", vec![Cell::from(1.0), Cell::from(2.0)]),
        ])
        .unwrap_err();
        assert!(matches!(err, StatError::DimensionMismatch { .. }));
    }

    #[test]
    fn select_rows_keeps_order() {
        let ds = Dataset::from_columns(vec![(
            "x",
            vec![Cell::from(1.0), Cell::from(2.0), Cell::from(3.0)],
        )])
        .unwrap();
        let sub = ds.select_rows(&[2, 0, 9]);
        assert_eq!(sub.numeric_column("x").unwrap(), vec![3.0, 1.0]);
    }

    #[test]
    fn labels() {
        assert_eq!(Cell::from(4.0).label().as_deref(), Some("4"));
        assert_eq!(Cell::from(true).label().as_deref(), Some("true"));
        assert_eq!(Cell::Null.label(), None);
        assert_eq!(Cell::from(None::<f64>), Cell::Null);
    }
}
