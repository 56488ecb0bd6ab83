//! Correlation and simple linear regression.
//!
//! Inputs may contain missing observations encoded as non-finite values;
//! every function works on the pairwise-complete observations (rows where
//! both sides are finite).
//!
//! # Correlation Analysis
//!
//! ```
//! use u_statlab::analysis::{correlation_matrix, CorrelationMethod};
//!
//! // Height (cm), weight (kg) and commute (min); one commute is missing.
//! let data = vec![
//!     vec![160.0, 165.0, 170.0, 175.0, 180.0, 185.0],
//!     vec![55.0, 61.0, 66.0, 72.0, 77.0, 83.0],
//!     vec![40.0, 35.0, 38.0, 30.0, f64::NAN, 25.0],
//! ];
//! let names = vec!["height".to_string(), "weight".into(), "commute".into()];
//! let matrix = correlation_matrix(&data, &names, CorrelationMethod::Pearson, 0.05).unwrap();
//!
//! assert_eq!(matrix.get(0, 0), 1.0);
//! assert!((matrix.get(0, 1) - 0.999_681).abs() < 1e-5);
//! assert_eq!(matrix.sizes[0][2], 5);
//! assert!(matrix.get(0, 2) < -0.9);
//! assert_eq!(matrix.strong_pairs(0.9)[0].column_b, "weight");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Degeneracy, StatError};
use crate::hypothesis::average_ranks;
use crate::special::t_two_sided_p;
use crate::validation::{check_alpha, require_pairs};

/// Variances below this are treated as zero.
const VARIANCE_EPS: f64 = 1e-300;

// ── Correlation ───────────────────────────────────────────────────────

/// Method for correlation computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    /// Pearson product-moment correlation.
    #[default]
    Pearson,
    /// Spearman rank correlation (Pearson on average ranks).
    Spearman,
}

/// Correlation coefficient with its significance test H₀: ρ = 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationResult {
    pub method: CorrelationMethod,
    /// Coefficient in [−1, 1].
    pub correlation: f64,
    pub r_squared: f64,
    /// `r·√((n−2)/(1−r²))`, Student-t with n − 2 degrees of freedom.
    pub t_statistic: f64,
    pub df: f64,
    pub p_value: f64,
    pub alpha: f64,
    pub significant: bool,
    /// Number of complete pairs.
    pub n: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Degeneracy>,
}

fn pearson_core(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let (dx, dy) = (a - mx, b - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx < VARIANCE_EPS || syy < VARIANCE_EPS {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

fn correlation_result(
    method: CorrelationMethod,
    r: Option<f64>,
    n: usize,
    alpha: f64,
) -> CorrelationResult {
    let df = n as f64 - 2.0;
    let Some(r) = r else {
        return CorrelationResult {
            method,
            correlation: f64::NAN,
            r_squared: f64::NAN,
            t_statistic: f64::NAN,
            df,
            p_value: f64::NAN,
            alpha,
            significant: false,
            n,
            error: Some(Degeneracy::ZeroVariance),
        };
    };

    let r2 = r * r;
    let (t, p) = if r2 >= 1.0 {
        (f64::INFINITY.copysign(r), 0.0)
    } else {
        let t = r * (df / (1.0 - r2)).sqrt();
        (t, t_two_sided_p(t, df))
    };

    CorrelationResult {
        method,
        correlation: r,
        r_squared: r2,
        t_statistic: t,
        df,
        p_value: p,
        alpha,
        significant: p < alpha,
        n,
        error: None,
    }
}

/// Pearson correlation over complete pairs.
///
/// A side with zero variance yields a sentinel with `NaN` correlation.
///
/// # Errors
///
/// [`StatError::DimensionMismatch`] for unequal lengths and
/// [`StatError::InsufficientData`] with fewer than three complete pairs.
///
/// ```
/// use u_statlab::analysis::pearson;
///
/// let r = pearson(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 5.0, 4.0, 5.0], 0.05).unwrap();
/// assert!((r.correlation - 0.774597).abs() < 1e-6);
/// assert!((r.p_value - 0.124027).abs() < 1e-5);
/// assert!(!r.significant);
/// ```
pub fn pearson(x: &[f64], y: &[f64], alpha: f64) -> Result<CorrelationResult, StatError> {
    check_alpha(alpha)?;
    let (xs, ys) = require_pairs(x, y, 3)?;
    Ok(correlation_result(
        CorrelationMethod::Pearson,
        pearson_core(&xs, &ys),
        xs.len(),
        alpha,
    ))
}

/// Spearman rank correlation over complete pairs; ties get average ranks.
pub fn spearman(x: &[f64], y: &[f64], alpha: f64) -> Result<CorrelationResult, StatError> {
    check_alpha(alpha)?;
    let (xs, ys) = require_pairs(x, y, 3)?;
    let (rx, ry) = (average_ranks(&xs), average_ranks(&ys));
    Ok(correlation_result(
        CorrelationMethod::Spearman,
        pearson_core(&rx, &ry),
        xs.len(),
        alpha,
    ))
}

/// Dispatches to [`pearson`] or [`spearman`].
pub fn correlation(
    x: &[f64],
    y: &[f64],
    method: CorrelationMethod,
    alpha: f64,
) -> Result<CorrelationResult, StatError> {
    match method {
        CorrelationMethod::Pearson => pearson(x, y, alpha),
        CorrelationMethod::Spearman => spearman(x, y, alpha),
    }
}

// ── Correlation Matrix ────────────────────────────────────────────────

/// A pair of columns and their correlation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationPair {
    pub column_a: String,
    pub column_b: String,
    pub correlation: f64,
    pub p_value: f64,
    pub n: usize,
}

/// Symmetric correlation matrix over pairwise-complete observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationMatrix {
    pub method: CorrelationMethod,
    pub names: Vec<String>,
    /// `values[i][j]`; `NaN` where a pair has fewer than three complete
    /// observations or a constant side.
    pub values: Vec<Vec<f64>>,
    pub p_values: Vec<Vec<f64>>,
    /// Complete-pair counts.
    pub sizes: Vec<Vec<usize>>,
}

impl CorrelationMatrix {
    /// Number of variables.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` for a matrix without variables.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Correlation of variables `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    /// Upper-triangle pairs with a defined correlation, in column order.
    pub fn pairs(&self) -> Vec<CorrelationPair> {
        let k = self.len();
        let mut out = Vec::new();
        for i in 0..k {
            for j in (i + 1)..k {
                let r = self.values[i][j];
                if r.is_finite() {
                    out.push(CorrelationPair {
                        column_a: self.names[i].clone(),
                        column_b: self.names[j].clone(),
                        correlation: r,
                        p_value: self.p_values[i][j],
                        n: self.sizes[i][j],
                    });
                }
            }
        }
        out
    }

    /// Pairs with |r| ≥ `threshold`, sorted by |r| descending.
    ///
    /// Equal |r| keep column order.
    pub fn strong_pairs(&self, threshold: f64) -> Vec<CorrelationPair> {
        let mut pairs: Vec<CorrelationPair> = self
            .pairs()
            .into_iter()
            .filter(|p| p.correlation.abs() >= threshold)
            .collect();
        pairs.sort_by(|a, b| b.correlation.abs().total_cmp(&a.correlation.abs()));
        pairs
    }
}

/// Computes the correlation matrix of equal-length columns.
///
/// Non-finite entries mark missing observations. Pairs that cannot be
/// correlated are `NaN` rather than an error.
///
/// # Errors
///
/// - [`StatError::DimensionMismatch`] when `names` and `columns` differ in
///   length, or columns differ in length.
/// - [`StatError::InsufficientData`] with fewer than two columns.
pub fn correlation_matrix(
    columns: &[Vec<f64>],
    names: &[String],
    method: CorrelationMethod,
    alpha: f64,
) -> Result<CorrelationMatrix, StatError> {
    check_alpha(alpha)?;
    if names.len() != columns.len() {
        return Err(StatError::DimensionMismatch {
            expected: columns.len(),
            actual: names.len(),
        });
    }
    let k = columns.len();
    if k < 2 {
        return Err(StatError::InsufficientData {
            min_required: 2,
            actual: k,
        });
    }
    let rows = columns[0].len();
    if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
        return Err(StatError::DimensionMismatch {
            expected: rows,
            actual: bad.len(),
        });
    }

    let mut values = vec![vec![f64::NAN; k]; k];
    let mut p_values = vec![vec![f64::NAN; k]; k];
    let mut sizes = vec![vec![0usize; k]; k];
    for i in 0..k {
        let own = columns[i].iter().filter(|v| v.is_finite()).count();
        sizes[i][i] = own;
        if own > 0 {
            values[i][i] = 1.0;
            p_values[i][i] = 0.0;
        }
        for j in (i + 1)..k {
            let result = match correlation(&columns[i], &columns[j], method, alpha) {
                Ok(r) => r,
                Err(StatError::InsufficientData { actual, .. }) => {
                    sizes[i][j] = actual;
                    sizes[j][i] = actual;
                    continue;
                }
                Err(e) => return Err(e),
            };
            for (a, b) in [(i, j), (j, i)] {
                values[a][b] = result.correlation;
                p_values[a][b] = result.p_value;
                sizes[a][b] = result.n;
            }
        }
    }

    Ok(CorrelationMatrix {
        method,
        names: names.to_vec(),
        values,
        p_values,
        sizes,
    })
}

// ── Regression Analysis ───────────────────────────────────────────────

/// Ordinary least squares fit of `y = intercept + slope·x`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearRegression {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination.
    pub r_squared: f64,
    pub adjusted_r_squared: f64,
    /// Standard error of the slope.
    pub std_error: f64,
    /// Slope t statistic for H₀: slope = 0.
    pub t_statistic: f64,
    pub df: f64,
    pub p_value: f64,
    pub alpha: f64,
    pub significant: bool,
    /// Residual standard error √(SSE / (n − 2)).
    pub residual_std_error: f64,
    pub n: usize,
    /// Human-readable fit, e.g. `y = 2.0000x + 0.0200`.
    pub equation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Degeneracy>,
}

impl LinearRegression {
    /// Fitted value at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

fn format_equation(slope: f64, intercept: f64) -> String {
    let sign = if intercept < 0.0 { '-' } else { '+' };
    format!("y = {slope:.4}x {sign} {:.4}", intercept.abs())
}

/// Fits a simple linear regression of `y` on `x` over complete pairs.
///
/// A constant `x` or `y` yields a sentinel with `NaN` coefficients.
///
/// ```
/// use u_statlab::analysis::linear_regression;
///
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = [2.1, 3.9, 6.1, 7.9, 10.1];
/// let fit = linear_regression(&x, &y, 0.05).unwrap();
/// assert!((fit.slope - 2.0).abs() < 1e-12);
/// assert!((fit.intercept - 0.02).abs() < 1e-12);
/// assert!(fit.r_squared > 0.998);
/// assert_eq!(fit.equation, "y = 2.0000x + 0.0200");
/// ```
pub fn linear_regression(x: &[f64], y: &[f64], alpha: f64) -> Result<LinearRegression, StatError> {
    check_alpha(alpha)?;
    let (xs, ys) = require_pairs(x, y, 3)?;
    let n = xs.len();
    let nf = n as f64;
    let df = nf - 2.0;

    let mx = xs.iter().sum::<f64>() / nf;
    let my = ys.iter().sum::<f64>() / nf;
    let sxx: f64 = xs.iter().map(|v| (v - mx).powi(2)).sum();
    let sst: f64 = ys.iter().map(|v| (v - my).powi(2)).sum();
    if sxx < VARIANCE_EPS || sst < VARIANCE_EPS {
        return Ok(LinearRegression {
            slope: f64::NAN,
            intercept: f64::NAN,
            r_squared: f64::NAN,
            adjusted_r_squared: f64::NAN,
            std_error: f64::NAN,
            t_statistic: f64::NAN,
            df,
            p_value: f64::NAN,
            alpha,
            significant: false,
            residual_std_error: f64::NAN,
            n,
            equation: String::new(),
            error: Some(Degeneracy::ZeroVariance),
        });
    }

    let sxy: f64 = xs.iter().zip(&ys).map(|(a, b)| (a - mx) * (b - my)).sum();
    let slope = sxy / sxx;
    let intercept = my - slope * mx;
    let sse: f64 = xs
        .iter()
        .zip(&ys)
        .map(|(a, b)| (b - (intercept + slope * a)).powi(2))
        .sum();

    let r_squared = (1.0 - sse / sst).clamp(0.0, 1.0);
    let adjusted_r_squared = 1.0 - (1.0 - r_squared) * (nf - 1.0) / df;
    let residual_std_error = (sse / df).sqrt();
    let std_error = residual_std_error / sxx.sqrt();
    let (t_statistic, p_value) = if std_error > 0.0 {
        let t = slope / std_error;
        (t, t_two_sided_p(t, df))
    } else {
        // Exact fit.
        (f64::INFINITY.copysign(slope), 0.0)
    };

    Ok(LinearRegression {
        slope,
        intercept,
        r_squared,
        adjusted_r_squared,
        std_error,
        t_statistic,
        df,
        p_value,
        alpha,
        significant: p_value < alpha,
        residual_std_error,
        n,
        equation: format_equation(slope, intercept),
        error: None,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────
