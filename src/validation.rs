//! Dataset validation and precondition guards.
//!
//! [`validate_dataset`] checks the structural contract of a [`Dataset`]:
//! a non-empty, duplicate-free header list and at least one row. Rows whose
//! keys deviate from the headers are not errors; each deviation becomes a
//! warning in the returned [`ValidationReport`].
//!
//! The remaining guards check the preconditions of individual analyses and
//! return the cleaned inputs on success.
//!
//! ```
//! use u_statlab::dataset::Dataset;
//! use u_statlab::validation::validate_dataset;
//!
//! let ds = Dataset::from_json(r#"{"headers":["a","b"],"data":[{"a":1,"b":2},{"a":3}]}"#).unwrap();
//! let report = validate_dataset(&ds).unwrap();
//! assert_eq!(report.warnings.len(), 1);
//! ```

use std::collections::HashSet;

use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::StatError;

/// Result of a successful structural validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub row_count: usize,
    pub column_count: usize,
    /// Non-fatal deviations, one message per offending row and key.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Returns `true` when no warnings were raised.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Checks the structural contract of a dataset.
///
/// # Errors
///
/// - [`StatError::MissingHeaders`] when the header list is empty.
/// - [`StatError::DuplicateHeader`] when a header repeats.
/// - [`StatError::EmptyDataset`] when there are no rows.
pub fn validate_dataset(dataset: &Dataset) -> Result<ValidationReport, StatError> {
    if dataset.headers.is_empty() {
        return Err(StatError::MissingHeaders);
    }

    let mut seen = HashSet::with_capacity(dataset.headers.len());
    for h in &dataset.headers {
        if !seen.insert(h.as_str()) {
            return Err(StatError::DuplicateHeader { name: h.clone() });
        }
    }

    if dataset.data.is_empty() {
        return Err(StatError::EmptyDataset);
    }

    let mut warnings = Vec::new();
    for (i, row) in dataset.data.iter().enumerate() {
        for h in &dataset.headers {
            if !row.contains_key(h) {
                warnings.push(format!("row {i}: missing key '{h}'"));
            }
        }
        let mut extra: Vec<&String> = row.keys().filter(|k| !seen.contains(k.as_str())).collect();
        extra.sort();
        for k in extra {
            warnings.push(format!("row {i}: unexpected key '{k}'"));
        }
    }

    Ok(ValidationReport {
        row_count: dataset.row_count(),
        column_count: dataset.column_count(),
        warnings,
    })
}

// ── Argument Guards ───────────────────────────────────────────────────

/// Checks that a significance level lies in (0, 1).
///
/// ```
/// use u_statlab::validation::check_alpha;
///
/// assert!(check_alpha(0.05).is_ok());
/// assert!(check_alpha(0.0).is_err());
/// assert!(check_alpha(f64::NAN).is_err());
/// ```
pub fn check_alpha(alpha: f64) -> Result<(), StatError> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(StatError::invalid("alpha", format!("{alpha} is not in (0, 1)")))
    }
}

/// Checks that a confidence level lies in (0, 1).
pub fn check_confidence(confidence: f64) -> Result<(), StatError> {
    if confidence > 0.0 && confidence < 1.0 {
        Ok(())
    } else {
        Err(StatError::invalid(
            "confidence",
            format!("{confidence} is not in (0, 1)"),
        ))
    }
}

/// Returns the finite values of `data`, requiring at least `min_count` of them.
pub fn require_finite(data: &[f64], min_count: usize) -> Result<Vec<f64>, StatError> {
    let values: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    if values.len() < min_count {
        return Err(StatError::InsufficientData {
            min_required: min_count,
            actual: values.len(),
        });
    }
    Ok(values)
}

/// Pairs of finite values from two equal-length slices, requiring `min_pairs`.
///
/// Pairs where either side is non-finite are skipped.
///
/// # Errors
///
/// - [`StatError::DimensionMismatch`] if the slices differ in length.
/// - [`StatError::InsufficientData`] if fewer than `min_pairs` pairs survive.
pub fn require_pairs(
    a: &[f64],
    b: &[f64],
    min_pairs: usize,
) -> Result<(Vec<f64>, Vec<f64>), StatError> {
    if a.len() != b.len() {
        return Err(StatError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    let (xs, ys): (Vec<f64>, Vec<f64>) = a
        .iter()
        .zip(b)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(x, y)| (*x, *y))
        .unzip();
    if xs.len() < min_pairs {
        return Err(StatError::InsufficientData {
            min_required: min_pairs,
            actual: xs.len(),
        });
    }
    Ok((xs, ys))
}

/// Finite values of each group for ANOVA: at least two groups, each with
/// at least two finite values.
pub fn require_groups(groups: &[&[f64]]) -> Result<Vec<Vec<f64>>, StatError> {
    if groups.len() < 2 {
        return Err(StatError::InsufficientData {
            min_required: 2,
            actual: groups.len(),
        });
    }
    groups.iter().map(|g| require_finite(g, 2)).collect()
}

/// Checks that a contingency table is rectangular, at least 2×2, holds
/// finite non-negative counts, and has a positive total.
pub fn require_contingency(table: &[Vec<f64>]) -> Result<(), StatError> {
    if table.len() < 2 {
        return Err(StatError::InsufficientData {
            min_required: 2,
            actual: table.len(),
        });
    }
    let cols = table[0].len();
    if cols < 2 {
        return Err(StatError::InsufficientData {
            min_required: 2,
            actual: cols,
        });
    }
    let mut total = 0.0;
    for row in table {
        if row.len() != cols {
            return Err(StatError::DimensionMismatch {
                expected: cols,
                actual: row.len(),
            });
        }
        for &v in row {
            if !v.is_finite() || v < 0.0 {
                return Err(StatError::invalid(
                    "table",
                    "counts must be finite and non-negative",
                ));
            }
            total += v;
        }
    }
    if total <= 0.0 {
        return Err(StatError::invalid("table", "total count is zero"));
    }
    Ok(())
}

/// Numeric values of a dataset column, requiring `min_count` of them.
pub fn require_numeric_column(
    dataset: &Dataset,
    name: &str,
    min_count: usize,
) -> Result<Vec<f64>, StatError> {
    let values = dataset.numeric_column(name)?;
    if values.len() < min_count {
        return Err(StatError::InsufficientData {
            min_required: min_count,
            actual: values.len(),
        });
    }
    Ok(values)
}

/// Row-aligned numeric pairs from two dataset columns.
///
/// Rows where either cell is not numeric are skipped.
pub fn require_paired_columns(
    dataset: &Dataset,
    a: &str,
    b: &str,
    min_pairs: usize,
) -> Result<(Vec<f64>, Vec<f64>), StatError> {
    let col_a = dataset.column(a)?;
    let col_b = dataset.column(b)?;
    let (xs, ys): (Vec<f64>, Vec<f64>) = col_a
        .iter()
        .zip(&col_b)
        .filter_map(|(x, y)| Some((x.coerce_f64()?, y.coerce_f64()?)))
        .unzip();
    if xs.len() < min_pairs {
        return Err(StatError::InsufficientData {
            min_required: min_pairs,
            actual: xs.len(),
        });
    }
    Ok((xs, ys))
}
