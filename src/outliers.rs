//! Univariate outlier detection.
//!
//! Three detectors share one result shape:
//!
//! - **IQR** (Tukey fences): outside `[Q1 − k·IQR, Q3 + k·IQR]`, default k = 1.5.
//! - **Z-score**: `|x − x̄| / s > 3` with the sample standard deviation.
//! - **Modified z-score** (Iglewicz & Hoaglin): `|0.6745·(x − med) / MAD| > 3.5`.
//!
//! Indices refer to positions in the input slice; non-finite values are
//! skipped and never flagged.
//!
//! ```
//! use u_statlab::outliers::{detect_outliers, OutlierMethod};
//!
//! let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
//! let result = detect_outliers(&data, OutlierMethod::Iqr).unwrap();
//! assert_eq!(result.outliers, vec![100.0]);
//! assert_eq!(result.indices, vec![9]);
//! assert_eq!(result.percentage, 10.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::descriptive::{self, quantile_sorted, Estimator};
use crate::error::StatError;

/// Scale factor turning MAD into a normal-consistent σ estimate.
const MAD_FACTOR: f64 = 0.6745;

/// Spreads below this are treated as zero.
const SPREAD_EPS: f64 = 1e-15;

/// Method for univariate outlier detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    Iqr,
    ZScore,
    ModifiedZScore,
}

/// Thresholds of the three detectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierConfig {
    /// Tukey fence multiplier k.
    pub iqr_multiplier: f64,
    /// |z| threshold for [`OutlierMethod::ZScore`].
    pub z_threshold: f64,
    /// |M| threshold for [`OutlierMethod::ModifiedZScore`].
    pub modified_z_threshold: f64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            iqr_multiplier: 1.5,
            z_threshold: 3.0,
            modified_z_threshold: 3.5,
        }
    }
}

/// Outcome of one detector run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlierResult {
    pub method: OutlierMethod,
    /// Flagged values, in input order.
    pub outliers: Vec<f64>,
    /// Input positions of the flagged values.
    pub indices: Vec<usize>,
    /// Distance of each flagged value from the acceptance region, in the
    /// detector's own units (fence multiples, |z| or |M|).
    pub scores: Vec<f64>,
    pub count: usize,
    /// Flagged share of the finite values, in percent.
    pub percentage: f64,
    /// Acceptance region in data units.
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl OutlierResult {
    fn empty(method: OutlierMethod) -> Self {
        Self {
            method,
            outliers: Vec::new(),
            indices: Vec::new(),
            scores: Vec::new(),
            count: 0,
            percentage: 0.0,
            lower_bound: f64::NEG_INFINITY,
            upper_bound: f64::INFINITY,
        }
    }
}

/// Detects outliers with the default thresholds.
pub fn detect_outliers(data: &[f64], method: OutlierMethod) -> Result<OutlierResult, StatError> {
    detect_outliers_with(data, method, &OutlierConfig::default())
}

/// Detects outliers with explicit thresholds.
///
/// Samples with fewer than three finite values, and samples with zero
/// spread under the chosen detector, have no outliers.
///
/// # Errors
///
/// [`StatError::NoFiniteValues`] when `data` holds no finite value.
pub fn detect_outliers_with(
    data: &[f64],
    method: OutlierMethod,
    config: &OutlierConfig,
) -> Result<OutlierResult, StatError> {
    let valid: Vec<(usize, f64)> = data
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .collect();
    if valid.is_empty() {
        return Err(StatError::NoFiniteValues);
    }
    if valid.len() < 3 {
        return Ok(OutlierResult::empty(method));
    }

    let values: Vec<f64> = valid.iter().map(|&(_, v)| v).collect();
    let (lower, upper, score): (f64, f64, Box<dyn Fn(f64) -> f64>) = match method {
        OutlierMethod::Iqr => {
            let mut sorted = values.clone();
            sorted.sort_by(|a, b| a.total_cmp(b));
            let q1 = quantile_sorted(&sorted, 0.25);
            let q3 = quantile_sorted(&sorted, 0.75);
            let iqr = q3 - q1;
            let lower = q1 - config.iqr_multiplier * iqr;
            let upper = q3 + config.iqr_multiplier * iqr;
            let unit = iqr.max(SPREAD_EPS);
            (
                lower,
                upper,
                Box::new(move |v: f64| {
                    if v < lower {
                        (lower - v) / unit
                    } else {
                        (v - upper) / unit
                    }
                }),
            )
        }
        OutlierMethod::ZScore => {
            let mean = descriptive::mean(&values)?;
            let sd = descriptive::std_dev(&values, Estimator::Sample)?;
            if sd < SPREAD_EPS {
                return Ok(OutlierResult::empty(method));
            }
            let half = config.z_threshold * sd;
            (
                mean - half,
                mean + half,
                Box::new(move |v: f64| ((v - mean) / sd).abs()),
            )
        }
        OutlierMethod::ModifiedZScore => {
            let median = descriptive::median(&values)?;
            let mad = descriptive::median_absolute_deviation(&values)?;
            if mad < SPREAD_EPS {
                return Ok(OutlierResult::empty(method));
            }
            let half = config.modified_z_threshold * mad / MAD_FACTOR;
            (
                median - half,
                median + half,
                Box::new(move |v: f64| (MAD_FACTOR * (v - median) / mad).abs()),
            )
        }
    };

    let mut result = OutlierResult {
        lower_bound: lower,
        upper_bound: upper,
        ..OutlierResult::empty(method)
    };
    for &(idx, v) in &valid {
        if v < lower || v > upper {
            result.indices.push(idx);
            result.outliers.push(v);
            result.scores.push(score(v));
        }
    }
    result.count = result.indices.len();
    result.percentage = result.count as f64 / valid.len() as f64 * 100.0;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iqr_fences() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
        let r = detect_outliers(&data, OutlierMethod::Iqr).unwrap();
        // Q1 = 3.25, Q3 = 7.75, IQR = 4.5
        assert!((r.lower_bound - (3.25 - 6.75)).abs() < 1e-12);
        assert!((r.upper_bound - 14.5).abs() < 1e-12);
        assert_eq!(r.count, 1);
        assert!((r.scores[0] - 85.5 / 4.5).abs() < 1e-12);
    }

    #[test]
    fn indices_skip_non_finite() {
        let data = [f64::NAN, 1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 50.0];
        let r = detect_outliers(&data, OutlierMethod::Iqr).unwrap();
        assert_eq!(r.indices, vec![8]);
        assert!((r.percentage - 12.5).abs() < 1e-12);
    }

    #[test]
    fn zscore_needs_extreme_value() {
        let mut data: Vec<f64> = (0..30).map(|i| (i % 5) as f64).collect();
        data.push(40.0);
        let r = detect_outliers(&data, OutlierMethod::ZScore).unwrap();
        assert_eq!(r.outliers, vec![40.0]);
        assert!(r.scores[0] > 3.0);

        // With n = 10 a single point cannot reach |z| > 3 under the sample std.
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
        let r = detect_outliers(&data, OutlierMethod::ZScore).unwrap();
        assert_eq!(r.count, 0);
    }

    #[test]
    fn modified_zscore() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
        let r = detect_outliers(&data, OutlierMethod::ModifiedZScore).unwrap();
        // median 5.5, MAD 2.5
        assert_eq!(r.outliers, vec![100.0]);
        assert!((r.scores[0] - 0.6745 * 94.5 / 2.5).abs() < 1e-9);
    }

    #[test]
    fn zero_spread_has_no_outliers() {
        let data = [4.0; 6];
        for method in [
            OutlierMethod::Iqr,
            OutlierMethod::ZScore,
            OutlierMethod::ModifiedZScore,
        ] {
            assert_eq!(detect_outliers(&data, method).unwrap().count, 0);
        }
    }

    #[test]
    fn custom_multiplier() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 13.0];
        let config = OutlierConfig {
            iqr_multiplier: 1.0,
            ..OutlierConfig::default()
        };
        assert_eq!(detect_outliers(&data, OutlierMethod::Iqr).unwrap().count, 0);
        assert_eq!(
            detect_outliers_with(&data, OutlierMethod::Iqr, &config)
                .unwrap()
                .count,
            1
        );
    }

    #[test]
    fn tiny_and_empty_samples() {
        assert_eq!(detect_outliers(&[1.0, 50.0], OutlierMethod::Iqr).unwrap().count, 0);
        assert_eq!(
            detect_outliers(&[f64::NAN], OutlierMethod::Iqr),
            Err(StatError::NoFiniteValues)
        );
    }
}
