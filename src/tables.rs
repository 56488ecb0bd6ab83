//! Frequency tables, contingency tables and group-by aggregation.
//!
//! Category labels come from [`Cell::label`]; null cells never form a
//! category. Label order is deterministic: first-seen order for
//! contingency rows/columns and group keys, descending count (ties by
//! first-seen) for frequency tables.
//!
//! ```
//! use u_statlab::dataset::Cell;
//! use u_statlab::tables::frequency_table;
//!
//! let cells: Vec<Cell> = ["b", "a", "b", "c", "a", "b"].iter().map(|&s| s.into()).collect();
//! let refs: Vec<&Cell> = cells.iter().collect();
//! let table = frequency_table(&refs);
//! assert_eq!(table.entries[0].value, "b");
//! assert_eq!(table.entries[0].count, 3);
//! assert_eq!(table.entries[1].value, "a");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dataset::{Cell, Dataset};
use crate::descriptive::{self, Estimator};
use crate::error::StatError;

// ── Frequency Table ───────────────────────────────────────────────────

/// One category in a [`FrequencyTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
    /// Share of non-null cells, in percent.
    pub percentage: f64,
}

/// Category counts of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyTable {
    /// Sorted by descending count, ties in first-seen order.
    pub entries: Vec<FrequencyEntry>,
    /// Number of non-null cells.
    pub total: usize,
}

impl FrequencyTable {
    /// Number of distinct categories.
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    /// The most frequent category, if any.
    pub fn mode(&self) -> Option<&FrequencyEntry> {
        self.entries.first()
    }

    /// The `n` most frequent categories.
    pub fn top(&self, n: usize) -> &[FrequencyEntry] {
        &self.entries[..n.min(self.entries.len())]
    }
}

/// Counts the categories of a column, skipping nulls.
pub fn frequency_table(cells: &[&Cell]) -> FrequencyTable {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for label in cells.iter().filter_map(|c| c.label()) {
        match index.get(&label) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(label.clone(), counts.len());
                counts.push((label, 1));
            }
        }
    }

    // Stable sort keeps first-seen order within equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    let total: usize = counts.iter().map(|(_, c)| c).sum();
    let entries = counts
        .into_iter()
        .map(|(value, count)| FrequencyEntry {
            value,
            count,
            percentage: count as f64 / total as f64 * 100.0,
        })
        .collect();

    FrequencyTable { entries, total }
}

// ── Contingency Table ─────────────────────────────────────────────────

/// Dense cross-tabulation of two categorical columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContingencyTable {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    /// `counts[i][j]`: rows with label `row_labels[i]` and `column_labels[j]`.
    pub counts: Vec<Vec<f64>>,
    pub row_totals: Vec<f64>,
    pub column_totals: Vec<f64>,
    pub grand_total: f64,
}

/// Cross-tabulates two parallel columns, skipping rows where either is null.
///
/// # Errors
///
/// [`StatError::DimensionMismatch`] when the columns differ in length.
///
/// ```
/// use u_statlab::dataset::Cell;
/// use u_statlab::tables::contingency_table;
///
/// let a: Vec<Cell> = ["x", "y", "x"].iter().map(|&s| s.into()).collect();
/// let b: Vec<Cell> = [true, true, false].iter().map(|&v| v.into()).collect();
/// let t = contingency_table(&a.iter().collect::<Vec<_>>(), &b.iter().collect::<Vec<_>>()).unwrap();
/// assert_eq!(t.counts, vec![vec![1.0, 1.0], vec![1.0, 0.0]]);
/// assert_eq!(t.column_labels, vec!["true", "false"]);
/// assert_eq!(t.grand_total, 3.0);
/// ```
pub fn contingency_table(a: &[&Cell], b: &[&Cell]) -> Result<ContingencyTable, StatError> {
    if a.len() != b.len() {
        return Err(StatError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut row_labels: Vec<String> = Vec::new();
    let mut column_labels: Vec<String> = Vec::new();
    let mut row_index: HashMap<String, usize> = HashMap::new();
    let mut col_index: HashMap<String, usize> = HashMap::new();
    let mut pairs: Vec<(usize, usize)> = Vec::new();

    for (x, y) in a.iter().zip(b) {
        let (Some(rx), Some(cy)) = (x.label(), y.label()) else {
            continue;
        };
        let i = *row_index.entry(rx.clone()).or_insert_with(|| {
            row_labels.push(rx);
            row_labels.len() - 1
        });
        let j = *col_index.entry(cy.clone()).or_insert_with(|| {
            column_labels.push(cy);
            column_labels.len() - 1
        });
        pairs.push((i, j));
    }

    let mut counts = vec![vec![0.0; column_labels.len()]; row_labels.len()];
    for (i, j) in pairs {
        counts[i][j] += 1.0;
    }
    let row_totals: Vec<f64> = counts.iter().map(|r| r.iter().sum()).collect();
    let column_totals: Vec<f64> = (0..column_labels.len())
        .map(|j| counts.iter().map(|r| r[j]).sum())
        .collect();
    let grand_total = row_totals.iter().sum();

    Ok(ContingencyTable {
        row_labels,
        column_labels,
        counts,
        row_totals,
        column_totals,
        grand_total,
    })
}

// ── Group-By ──────────────────────────────────────────────────────────

/// Aggregation applied to the numeric cells of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Mean,
    Median,
    Sum,
    Min,
    Max,
    Std,
    Var,
    Count,
}

impl Aggregation {
    /// Applies the aggregation to the numeric values of one group.
    pub fn apply(self, values: &[f64]) -> Result<f64, StatError> {
        match self {
            Self::Mean => descriptive::mean(values),
            Self::Median => descriptive::median(values),
            Self::Sum => descriptive::sum(values),
            Self::Min => descriptive::min(values),
            Self::Max => descriptive::max(values),
            Self::Std => descriptive::std_dev(values, Estimator::Sample),
            Self::Var => descriptive::variance(values, Estimator::Sample),
            Self::Count => Ok(values.iter().filter(|v| v.is_finite()).count() as f64),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Sum => "sum",
            Self::Min => "min",
            Self::Max => "max",
            Self::Std => "std",
            Self::Var => "var",
            Self::Count => "count",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aggregation {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            "sum" => Ok(Self::Sum),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            "std" => Ok(Self::Std),
            "var" => Ok(Self::Var),
            "count" => Ok(Self::Count),
            other => Err(StatError::invalid(
                "aggregation",
                format!("unknown aggregation '{other}'"),
            )),
        }
    }
}

/// One aggregated value inside a [`GroupSummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupValue {
    pub column: String,
    pub aggregation: Aggregation,
    /// `None` when the group has no numeric cells the aggregation can use.
    pub value: Option<f64>,
}

/// Aggregates of one partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub key: String,
    /// Rows in the partition.
    pub rows: usize,
    pub values: Vec<GroupValue>,
}

/// Partitions `dataset` by the label of column `by` and aggregates the
/// numeric cells of each target column.
///
/// Groups appear in first-seen order; rows with a null key are skipped.
/// Only [`Cell::Number`] cells take part in the aggregations.
///
/// # Errors
///
/// [`StatError::ColumnNotFound`] for an unknown grouping or target column.
///
/// ```
/// use u_statlab::dataset::Dataset;
/// use u_statlab::tables::{group_by, Aggregation};
///
/// let ds = Dataset::from_json(r#"{"headers":["g","v"],"data":[
///     {"g":"a","v":1},{"g":"b","v":10},{"g":"a","v":3}]}"#).unwrap();
/// let groups = group_by(&ds, "g", &[("v", Aggregation::Mean)]).unwrap();
/// assert_eq!(groups[0].key, "a");
/// assert_eq!(groups[0].values[0].value, Some(2.0));
/// assert_eq!(groups[1].values[0].value, Some(10.0));
/// ```
pub fn group_by(
    dataset: &Dataset,
    by: &str,
    aggregations: &[(&str, Aggregation)],
) -> Result<Vec<GroupSummary>, StatError> {
    let keys = dataset.column(by)?;
    for (column, _) in aggregations {
        if !dataset.has_column(column) {
            return Err(StatError::ColumnNotFound {
                name: column.to_string(),
            });
        }
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut partitions: Vec<(String, Vec<usize>)> = Vec::new();
    for (row, cell) in keys.iter().enumerate() {
        let Some(label) = cell.label() else {
            continue;
        };
        match index.get(&label) {
            Some(&i) => partitions[i].1.push(row),
            None => {
                index.insert(label.clone(), partitions.len());
                partitions.push((label, vec![row]));
            }
        }
    }

    Ok(partitions
        .into_iter()
        .map(|(key, rows)| {
            let values = aggregations
                .iter()
                .map(|&(column, aggregation)| {
                    let numbers: Vec<f64> = rows
                        .iter()
                        .filter_map(|&r| dataset.cell(r, column).as_f64())
                        .collect();
                    GroupValue {
                        column: column.to_string(),
                        aggregation,
                        value: aggregation.apply(&numbers).ok(),
                    }
                })
                .collect();
            GroupSummary {
                key,
                rows: rows.len(),
                values,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|&s| Cell::from(s)).collect()
    }

    #[test]
    fn frequency_ties_keep_first_seen() {
        let data = cells(&["z", "y", "y", "z", "x"]);
        let refs: Vec<&Cell> = data.iter().collect();
        let table = frequency_table(&refs);
        let order: Vec<&str> = table.entries.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(order, vec!["z", "y", "x"]);
        assert_eq!(table.total, 5);
        assert!((table.entries[2].percentage - 20.0).abs() < 1e-12);
        assert_eq!(table.top(2).len(), 2);
        assert_eq!(table.top(10).len(), 3);
        assert_eq!(table.mode().map(|e| e.count), Some(2));
    }

    #[test]
    fn frequency_skips_nulls() {
        let data = vec![Cell::Null, Cell::from(1.0), Cell::from(1.0), Cell::Null];
        let refs: Vec<&Cell> = data.iter().collect();
        let table = frequency_table(&refs);
        assert_eq!(table.total, 2);
        assert_eq!(table.distinct(), 1);
        assert_eq!(table.entries[0].percentage, 100.0);
    }

    #[test]
    fn contingency_totals() {
        let a = cells(&["r1", "r2", "r1", "r2", "r1"]);
        let b = cells(&["c1", "c1", "c2", "c2", "c2"]);
        let t = contingency_table(
            &a.iter().collect::<Vec<_>>(),
            &b.iter().collect::<Vec<_>>(),
        )
        .unwrap();
        assert_eq!(t.counts, vec![vec![1.0, 2.0], vec![1.0, 1.0]]);
        assert_eq!(t.row_totals, vec![3.0, 2.0]);
        assert_eq!(t.column_totals, vec![2.0, 3.0]);
        assert_eq!(t.grand_total, 5.0);
    }

    #[test]
    fn contingency_length_mismatch() {
        let a = cells(&["x"]);
        let refs: Vec<&Cell> = a.iter().collect();
        assert!(contingency_table(&refs, &[]).is_err());
    }

    #[test]
    fn aggregation_parsing() {
        assert_eq!("MEAN".parse::<Aggregation>().unwrap(), Aggregation::Mean);
        assert_eq!(" var ".parse::<Aggregation>().unwrap(), Aggregation::Var);
        assert!("mode".parse::<Aggregation>().is_err());
        let parsed: Aggregation = serde_json::from_str("\"count\"").unwrap();
        assert_eq!(parsed, Aggregation::Count);
        assert_eq!(Aggregation::Std.to_string(), "std");
    }

    #[test]
    fn group_by_numeric_cells_only() {
        let ds = Dataset::from_json(
            r#"{"headers":["g","v"],"data":[
                {"g":"a","v":1},{"g":"a","v":"2"},{"g":"b","v":4},
                {"g":null,"v":100},{"g":"b","v":6},{"g":"a","v":null}]}"#,
        )
        .unwrap();
        let groups = group_by(
            &ds,
            "g",
            &[
                ("v", Aggregation::Count),
                ("v", Aggregation::Sum),
                ("v", Aggregation::Std),
            ],
        )
        .unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "a");
        assert_eq!(groups[0].rows, 3);
        assert_eq!(groups[0].values[0].value, Some(1.0));
        assert_eq!(groups[0].values[1].value, Some(1.0));
        // A single numeric value has no sample standard deviation.
        assert_eq!(groups[0].values[2].value, None);
        assert_eq!(groups[1].values[1].value, Some(10.0));
    }

    #[test]
    fn group_by_unknown_column() {
        let ds = Dataset::from_json(r#"{"headers":["g"],"data":[{"g":"a"}]}"#).unwrap();
        assert!(matches!(
            group_by(&ds, "g", &[("nope", Aggregation::Mean)]),
            Err(StatError::ColumnNotFound { .. })
        ));
        assert!(group_by(&ds, "h", &[]).is_err());
    }
}
