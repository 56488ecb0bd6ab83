//! Numeric aggregates over `f64` samples.
//!
//! Every function silently drops non-finite values (`NaN`, `±∞`) before
//! computing and returns [`StatError::NoFiniteValues`] when nothing remains.
//! Functions with a larger minimum sample size return
//! [`StatError::InsufficientData`].
//!
//! # Example
//!
//! ```
//! use u_statlab::descriptive::{describe, mean, median, quantile};
//!
//! let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
//! assert_eq!(mean(&data).unwrap(), 5.0);
//! assert_eq!(median(&data).unwrap(), 4.5);
//! assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.25).unwrap(), 2.0);
//!
//! let summary = describe(&data).unwrap();
//! assert_eq!(summary.count, 8);
//! assert_eq!(summary.max, 9.0);
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::error::StatError;

/// Divisor used by [`robust_scale`] to turn an IQR into a normal-consistent σ.
const IQR_TO_SIGMA: f64 = 1.349;

// ── Helpers ───────────────────────────────────────────────────────────

/// Copies the finite values of `data`, failing when there are none.
pub(crate) fn finite_values(data: &[f64]) -> Result<Vec<f64>, StatError> {
    let values: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return Err(StatError::NoFiniteValues);
    }
    Ok(values)
}

/// Finite values sorted ascending.
pub(crate) fn sorted_finite(data: &[f64]) -> Result<Vec<f64>, StatError> {
    let mut values = finite_values(data)?;
    values.sort_by(|a, b| a.total_cmp(b));
    Ok(values)
}

fn require(n: usize, min_required: usize) -> Result<(), StatError> {
    if n < min_required {
        Err(StatError::InsufficientData {
            min_required,
            actual: n,
        })
    } else {
        Ok(())
    }
}

/// Linear-interpolation quantile of an already sorted, non-empty slice.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = (n - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

fn raw_mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sum_sq_dev(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|x| (x - mean).powi(2)).sum()
}

// ── Location ──────────────────────────────────────────────────────────

/// Sum of the finite values.
pub fn sum(data: &[f64]) -> Result<f64, StatError> {
    Ok(finite_values(data)?.iter().sum())
}

/// Arithmetic mean.
pub fn mean(data: &[f64]) -> Result<f64, StatError> {
    Ok(raw_mean(&finite_values(data)?))
}

/// Median (average of the two middle values for even `n`).
pub fn median(data: &[f64]) -> Result<f64, StatError> {
    quantile(data, 0.5)
}

/// Quantile `q ∈ [0, 1]` with linear interpolation at position `(n − 1)·q`.
///
/// # Errors
///
/// [`StatError::InvalidArgument`] when `q` is outside [0, 1].
///
/// ```
/// use u_statlab::descriptive::quantile;
///
/// let data = [3.0, 1.0, 4.0, 1.0, 5.0];
/// assert_eq!(quantile(&data, 0.0).unwrap(), 1.0);
/// assert_eq!(quantile(&data, 1.0).unwrap(), 5.0);
/// assert_eq!(quantile(&data, 0.5).unwrap(), 3.0);
/// ```
pub fn quantile(data: &[f64], q: f64) -> Result<f64, StatError> {
    if !(0.0..=1.0).contains(&q) {
        return Err(StatError::invalid("q", "must be in [0, 1]"));
    }
    let sorted = sorted_finite(data)?;
    Ok(quantile_sorted(&sorted, q))
}

/// Percentile `p ∈ [0, 100]`; `percentile(x, p) == quantile(x, p / 100)`.
pub fn percentile(data: &[f64], p: f64) -> Result<f64, StatError> {
    if !(0.0..=100.0).contains(&p) {
        return Err(StatError::invalid("p", "must be in [0, 100]"));
    }
    quantile(data, p / 100.0)
}

/// Smallest finite value.
pub fn min(data: &[f64]) -> Result<f64, StatError> {
    Ok(finite_values(data)?.into_iter().fold(f64::INFINITY, f64::min))
}

/// Largest finite value.
pub fn max(data: &[f64]) -> Result<f64, StatError> {
    Ok(finite_values(data)?
        .into_iter()
        .fold(f64::NEG_INFINITY, f64::max))
}

/// All modal values in first-seen order.
///
/// ```
/// use u_statlab::descriptive::mode;
///
/// assert_eq!(mode(&[3.0, 1.0, 3.0, 1.0, 2.0]).unwrap(), vec![3.0, 1.0]);
/// ```
pub fn mode(data: &[f64]) -> Result<Vec<f64>, StatError> {
    let values = finite_values(data)?;
    let mut counts: HashMap<u64, usize> = HashMap::new();
    let mut order: Vec<f64> = Vec::new();
    for &v in &values {
        // Fold -0.0 into 0.0 so both count as one value.
        let key = (v + 0.0).to_bits();
        let entry = counts.entry(key).or_insert(0);
        if *entry == 0 {
            order.push(v + 0.0);
        }
        *entry += 1;
    }
    let best = counts.values().copied().max().unwrap_or(0);
    Ok(order
        .into_iter()
        .filter(|v| counts.get(&v.to_bits()) == Some(&best))
        .collect())
}

/// Geometric mean of a strictly positive sample.
///
/// # Errors
///
/// [`StatError::NonPositiveValue`] if any finite value is `<= 0`.
pub fn geometric_mean(data: &[f64]) -> Result<f64, StatError> {
    let values = finite_values(data)?;
    if let Some(&bad) = values.iter().find(|&&v| v <= 0.0) {
        return Err(StatError::NonPositiveValue { value: bad });
    }
    let log_mean = values.iter().map(|v| v.ln()).sum::<f64>() / values.len() as f64;
    Ok(log_mean.exp())
}

/// Harmonic mean of a strictly positive sample.
///
/// # Errors
///
/// [`StatError::NonPositiveValue`] if any finite value is `<= 0`.
///
/// ```
/// use u_statlab::descriptive::harmonic_mean;
///
/// assert!((harmonic_mean(&[1.0, 2.0, 4.0]).unwrap() - 12.0 / 7.0).abs() < 1e-12);
/// assert!(harmonic_mean(&[1.0, 0.0]).is_err());
/// ```
pub fn harmonic_mean(data: &[f64]) -> Result<f64, StatError> {
    let values = finite_values(data)?;
    if let Some(&bad) = values.iter().find(|&&v| v <= 0.0) {
        return Err(StatError::NonPositiveValue { value: bad });
    }
    let inv_sum: f64 = values.iter().map(|v| 1.0 / v).sum();
    Ok(values.len() as f64 / inv_sum)
}

/// Mean after dropping `⌊percent·n/100⌋` values from each tail.
///
/// # Errors
///
/// - [`StatError::InvalidArgument`] if `percent` is outside [0, 50].
/// - [`StatError::InsufficientData`] if trimming leaves nothing.
///
/// ```
/// use u_statlab::descriptive::trimmed_mean;
///
/// let data = [1.0, 2.0, 3.0, 4.0, 100.0];
/// assert_eq!(trimmed_mean(&data, 20.0).unwrap(), 3.0);
/// ```
pub fn trimmed_mean(data: &[f64], percent: f64) -> Result<f64, StatError> {
    if !(0.0..=50.0).contains(&percent) {
        return Err(StatError::invalid("percent", "must be in [0, 50]"));
    }
    let sorted = sorted_finite(data)?;
    let n = sorted.len();
    let k = (percent * n as f64 / 100.0).floor() as usize;
    if 2 * k >= n {
        return Err(StatError::InsufficientData {
            min_required: 2 * k + 1,
            actual: n,
        });
    }
    Ok(raw_mean(&sorted[k..n - k]))
}

/// Weighted mean, ignoring pairs with a non-finite value or an invalid weight.
///
/// # Errors
///
/// - [`StatError::DimensionMismatch`] if the slices differ in length.
/// - [`StatError::InvalidArgument`] if the retained weights sum to zero.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> Result<f64, StatError> {
    if values.len() != weights.len() {
        return Err(StatError::DimensionMismatch {
            expected: values.len(),
            actual: weights.len(),
        });
    }
    let (num, den) = values
        .iter()
        .zip(weights)
        .filter(|(v, w)| v.is_finite() && w.is_finite() && **w >= 0.0)
        .fold((0.0, 0.0), |(num, den), (v, w)| (num + v * w, den + w));
    if den == 0.0 {
        return Err(StatError::invalid("weights", "total weight is zero"));
    }
    Ok(num / den)
}

// ── Dispersion ────────────────────────────────────────────────────────

/// Variance / standard-deviation estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Estimator {
    /// Bessel-corrected, divides by `n − 1`.
    #[default]
    Sample,
    /// Divides by `n`.
    Population,
}

/// Variance with the chosen estimator.
///
/// # Errors
///
/// [`StatError::InsufficientData`] for the sample estimator with `n < 2`.
///
/// ```
/// use u_statlab::descriptive::{variance, Estimator};
///
/// let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((variance(&data, Estimator::Sample).unwrap() - 32.0 / 7.0).abs() < 1e-12);
/// assert_eq!(variance(&data, Estimator::Population).unwrap(), 4.0);
/// ```
pub fn variance(data: &[f64], estimator: Estimator) -> Result<f64, StatError> {
    let values = finite_values(data)?;
    let n = values.len();
    let ss = sum_sq_dev(&values, raw_mean(&values));
    match estimator {
        Estimator::Sample => {
            require(n, 2)?;
            Ok(ss / (n - 1) as f64)
        }
        Estimator::Population => Ok(ss / n as f64),
    }
}

/// Standard deviation, the square root of [`variance`].
pub fn std_dev(data: &[f64], estimator: Estimator) -> Result<f64, StatError> {
    variance(data, estimator).map(f64::sqrt)
}

/// Max − min.
pub fn range(data: &[f64]) -> Result<f64, StatError> {
    let values = finite_values(data)?;
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    Ok(hi - lo)
}

/// Interquartile range Q3 − Q1.
pub fn iqr(data: &[f64]) -> Result<f64, StatError> {
    let sorted = sorted_finite(data)?;
    Ok(quantile_sorted(&sorted, 0.75) - quantile_sorted(&sorted, 0.25))
}

/// Difference between two percentiles, `percentile(hi) − percentile(lo)`.
pub fn percentile_range(data: &[f64], lo: f64, hi: f64) -> Result<f64, StatError> {
    if lo > hi {
        return Err(StatError::invalid("lo", "must not exceed hi"));
    }
    Ok(percentile(data, hi)? - percentile(data, lo)?)
}

/// Mean absolute deviation around the mean.
pub fn mean_absolute_deviation(data: &[f64]) -> Result<f64, StatError> {
    let values = finite_values(data)?;
    let m = raw_mean(&values);
    Ok(values.iter().map(|x| (x - m).abs()).sum::<f64>() / values.len() as f64)
}

/// Median absolute deviation around the median (unscaled).
///
/// ```
/// use u_statlab::descriptive::median_absolute_deviation;
///
/// assert_eq!(median_absolute_deviation(&[1.0, 1.0, 2.0, 2.0, 4.0, 6.0, 9.0]).unwrap(), 1.0);
/// ```
pub fn median_absolute_deviation(data: &[f64]) -> Result<f64, StatError> {
    let sorted = sorted_finite(data)?;
    let med = quantile_sorted(&sorted, 0.5);
    let mut deviations: Vec<f64> = sorted.iter().map(|x| (x - med).abs()).collect();
    deviations.sort_by(|a, b| a.total_cmp(b));
    Ok(quantile_sorted(&deviations, 0.5))
}

/// Coefficient of variation: sample std / mean.
///
/// # Errors
///
/// [`StatError::InvalidArgument`] when the mean is zero.
pub fn coefficient_of_variation(data: &[f64]) -> Result<f64, StatError> {
    let m = mean(data)?;
    if m == 0.0 {
        return Err(StatError::invalid("data", "mean is zero"));
    }
    Ok(std_dev(data, Estimator::Sample)? / m)
}

/// Standard error of the mean: sample std / √n.
pub fn standard_error(data: &[f64]) -> Result<f64, StatError> {
    let values = finite_values(data)?;
    let s = std_dev(&values, Estimator::Sample)?;
    Ok(s / (values.len() as f64).sqrt())
}

/// IQR / 1.349, a normal-consistent robust σ. Zero when the IQR is zero.
pub fn robust_scale(data: &[f64]) -> Result<f64, StatError> {
    let spread = iqr(data)?;
    if spread == 0.0 {
        return Ok(0.0);
    }
    Ok(spread / IQR_TO_SIGMA)
}

/// Gini coefficient `Σᵢⱼ|xᵢ − xⱼ| / (2n²x̄)`; zero when the mean is zero.
///
/// ```
/// use u_statlab::descriptive::gini;
///
/// assert_eq!(gini(&[5.0, 5.0, 5.0]).unwrap(), 0.0);
/// assert!((gini(&[0.0, 0.0, 0.0, 1.0]).unwrap() - 0.75).abs() < 1e-12);
/// ```
pub fn gini(data: &[f64]) -> Result<f64, StatError> {
    let sorted = sorted_finite(data)?;
    let n = sorted.len() as f64;
    let m = raw_mean(&sorted);
    if m == 0.0 {
        return Ok(0.0);
    }
    // Σᵢⱼ|xᵢ − xⱼ| = 2 Σᵢ (2i − n − 1)·x₍ᵢ₎ over the 1-based sorted order.
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, x)| (2.0 * (i as f64 + 1.0) - n - 1.0) * x)
        .sum();
    Ok(2.0 * weighted / (2.0 * n * n * m))
}

// ── Shape ─────────────────────────────────────────────────────────────

/// Central moments m2, m3, m4 (population form).
fn central_moments(values: &[f64]) -> (f64, f64, f64) {
    let n = values.len() as f64;
    let m = raw_mean(values);
    let (s2, s3, s4) = values.iter().fold((0.0, 0.0, 0.0), |(s2, s3, s4), x| {
        let d = x - m;
        let d2 = d * d;
        (s2 + d2, s3 + d2 * d, s4 + d2 * d2)
    });
    (s2 / n, s3 / n, s4 / n)
}

/// Sample skewness.
///
/// With `bias = true` this is the moment coefficient g₁ = m₃ / m₂^1.5; with
/// `bias = false` it is the adjusted Fisher–Pearson coefficient
/// G₁ = g₁·√(n(n − 1))/(n − 2). Requires `n >= 3`.
///
/// # Errors
///
/// - [`StatError::InsufficientData`] for `n < 3`.
/// - [`StatError::InvalidArgument`] when the sample has zero variance.
///
/// ```
/// use u_statlab::descriptive::skewness;
///
/// let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((skewness(&data, true).unwrap() - 0.65625).abs() < 1e-12);
/// assert!((skewness(&data, false).unwrap() - 0.818_487).abs() < 1e-5);
/// ```
pub fn skewness(data: &[f64], bias: bool) -> Result<f64, StatError> {
    let values = finite_values(data)?;
    let n = values.len();
    require(n, 3)?;
    let (m2, m3, _) = central_moments(&values);
    if m2 == 0.0 {
        return Err(StatError::invalid("data", "zero variance"));
    }
    let g1 = m3 / m2.powf(1.5);
    if bias {
        return Ok(g1);
    }
    let nf = n as f64;
    Ok(g1 * (nf * (nf - 1.0)).sqrt() / (nf - 2.0))
}

/// Sample kurtosis.
///
/// With `bias = true` this is m₄ / m₂²; with `bias = false` it is the
/// unbiased estimator G₂. `fisher = true` reports excess kurtosis (normal
/// = 0), otherwise normal = 3. Requires `n >= 4`.
///
/// # Errors
///
/// - [`StatError::InsufficientData`] for `n < 4`.
/// - [`StatError::InvalidArgument`] when the sample has zero variance.
///
/// ```
/// use u_statlab::descriptive::kurtosis;
///
/// let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((kurtosis(&data, true, true).unwrap() + 0.21875).abs() < 1e-12);
/// assert!((kurtosis(&data, true, false).unwrap() - 2.78125).abs() < 1e-12);
/// ```
pub fn kurtosis(data: &[f64], bias: bool, fisher: bool) -> Result<f64, StatError> {
    let values = finite_values(data)?;
    let n = values.len();
    require(n, 4)?;
    let (m2, _, m4) = central_moments(&values);
    if m2 == 0.0 {
        return Err(StatError::invalid("data", "zero variance"));
    }

    let excess = if bias {
        m4 / (m2 * m2) - 3.0
    } else {
        let nf = n as f64;
        let s2 = m2 * nf / (nf - 1.0);
        let sum4 = m4 * nf / (s2 * s2);
        nf * (nf + 1.0) / ((nf - 1.0) * (nf - 2.0) * (nf - 3.0)) * sum4
            - 3.0 * (nf - 1.0).powi(2) / ((nf - 2.0) * (nf - 3.0))
    };

    Ok(if fisher { excess } else { excess + 3.0 })
}

// ── Summary ───────────────────────────────────────────────────────────

/// Descriptive summary of one numeric sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericSummary {
    /// Number of finite values.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; 0 when `count == 1`.
    pub std_dev: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub iqr: f64,
    /// Bias-corrected skewness, when `count >= 3` and variance is non-zero.
    pub skewness: Option<f64>,
    /// Bias-corrected excess kurtosis, when `count >= 4` and variance is non-zero.
    pub kurtosis: Option<f64>,
    /// Coefficient of variation, when the mean is non-zero.
    pub cv: Option<f64>,
    pub standard_error: f64,
}

/// Computes a [`NumericSummary`] in one pass over a sorted copy.
///
/// ```
/// use u_statlab::descriptive::describe;
///
/// let s = describe(&[1.0, 2.0, 3.0, 4.0, f64::NAN]).unwrap();
/// assert_eq!(s.count, 4);
/// assert_eq!(s.median, 2.5);
/// assert!(s.skewness.is_some());
/// ```
pub fn describe(data: &[f64]) -> Result<NumericSummary, StatError> {
    let sorted = sorted_finite(data)?;
    let n = sorted.len();
    let m = raw_mean(&sorted);
    let std_dev = if n > 1 {
        (sum_sq_dev(&sorted, m) / (n - 1) as f64).sqrt()
    } else {
        0.0
    };
    let q1 = quantile_sorted(&sorted, 0.25);
    let q3 = quantile_sorted(&sorted, 0.75);

    Ok(NumericSummary {
        count: n,
        mean: m,
        std_dev,
        min: sorted[0],
        q1,
        median: quantile_sorted(&sorted, 0.5),
        q3,
        max: sorted[n - 1],
        iqr: q3 - q1,
        skewness: skewness(&sorted, false).ok(),
        kurtosis: kurtosis(&sorted, false, true).ok(),
        cv: (m != 0.0 && n > 1).then(|| std_dev / m),
        standard_error: std_dev / (n as f64).sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [f64; 8] = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

    #[test]
    fn basic_location() {
        assert_eq!(mean(&SAMPLE).unwrap(), 5.0);
        assert_eq!(median(&SAMPLE).unwrap(), 4.5);
        assert_eq!(sum(&SAMPLE).unwrap(), 40.0);
        assert_eq!(min(&SAMPLE).unwrap(), 2.0);
        assert_eq!(max(&SAMPLE).unwrap(), 9.0);
        assert_eq!(range(&SAMPLE).unwrap(), 7.0);
    }

    #[test]
    fn non_finite_filtered() {
        let data = [1.0, f64::NAN, 3.0, f64::INFINITY];
        assert_eq!(mean(&data).unwrap(), 2.0);
        assert_eq!(
            mean(&[f64::NAN, f64::NEG_INFINITY]),
            Err(StatError::NoFiniteValues)
        );
        assert_eq!(mean(&[]), Err(StatError::NoFiniteValues));
    }

    #[test]
    fn quantile_interpolation() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&data, 0.25).unwrap(), 2.0);
        assert_eq!(quantile(&data, 0.75).unwrap(), 4.0);
        assert_eq!(iqr(&data).unwrap(), 2.0);
        assert!((quantile(&[1.0, 2.0], 0.3).unwrap() - 1.3).abs() < 1e-12);
        assert_eq!(quantile(&[7.0], 0.9).unwrap(), 7.0);
        assert!(quantile(&data, 1.5).is_err());
        assert_eq!(percentile(&data, 50.0).unwrap(), 3.0);
        assert_eq!(percentile_range(&data, 25.0, 75.0).unwrap(), 2.0);
    }

    #[test]
    fn variance_estimators() {
        assert!(matches!(
            variance(&[1.0], Estimator::Sample),
            Err(StatError::InsufficientData { min_required: 2, actual: 1 })
        ));
        assert_eq!(variance(&[1.0], Estimator::Population).unwrap(), 0.0);
        let s = std_dev(&SAMPLE, Estimator::Sample).unwrap();
        assert!((s * s - variance(&SAMPLE, Estimator::Sample).unwrap()).abs() < 1e-12);
        assert_eq!(std_dev(&SAMPLE, Estimator::Population).unwrap(), 2.0);
    }

    #[test]
    fn shape_statistics() {
        assert!((skewness(&SAMPLE, true).unwrap() - 0.65625).abs() < 1e-12);
        assert!((kurtosis(&SAMPLE, false, true).unwrap() - 0.940_625).abs() < 1e-6);
        assert!((kurtosis(&SAMPLE, false, false).unwrap() - 3.940_625).abs() < 1e-6);
        assert!(skewness(&[1.0, 2.0], true).is_err());
        assert!(kurtosis(&[1.0, 2.0, 3.0], true, true).is_err());
        assert!(skewness(&[4.0, 4.0, 4.0], false).is_err());
    }

    #[test]
    fn symmetric_sample_has_zero_skew() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(skewness(&data, false).unwrap().abs() < 1e-12);
    }

    #[test]
    fn special_means() {
        assert!((geometric_mean(&[1.0, 4.0, 16.0]).unwrap() - 4.0).abs() < 1e-12);
        assert!(matches!(
            geometric_mean(&[1.0, -2.0]),
            Err(StatError::NonPositiveValue { value }) if value == -2.0
        ));
        assert!(matches!(
            trimmed_mean(&[1.0, 2.0], 50.0),
            Err(StatError::InsufficientData { .. })
        ));
        assert!(trimmed_mean(&[1.0], 60.0).is_err());
    }

    #[test]
    fn weighted_mean_skips_bad_pairs() {
        let v = [1.0, 2.0, f64::NAN, 10.0];
        let w = [1.0, 3.0, 5.0, -1.0];
        assert!((weighted_mean(&v, &w).unwrap() - 7.0 / 4.0).abs() < 1e-12);
        assert!(weighted_mean(&[1.0], &[0.0]).is_err());
        assert!(matches!(
            weighted_mean(&[1.0, 2.0], &[1.0]),
            Err(StatError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn robust_measures() {
        assert_eq!(robust_scale(&[3.0, 3.0, 3.0, 3.0]).unwrap(), 0.0);
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((robust_scale(&data).unwrap() - 2.0 / 1.349).abs() < 1e-12);
        assert!((mean_absolute_deviation(&data).unwrap() - 1.2).abs() < 1e-12);
        assert_eq!(median_absolute_deviation(&data).unwrap(), 1.0);
    }

    #[test]
    fn cv_and_se() {
        let cv = coefficient_of_variation(&SAMPLE).unwrap();
        assert!((cv - (32.0f64 / 7.0).sqrt() / 5.0).abs() < 1e-12);
        assert!(coefficient_of_variation(&[-1.0, 1.0]).is_err());
        let se = standard_error(&SAMPLE).unwrap();
        assert!((se - (32.0f64 / 7.0).sqrt() / 8f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn gini_zero_mean() {
        assert_eq!(gini(&[-1.0, 1.0]).unwrap(), 0.0);
        // Pairwise formula cross-check.
        let data: [f64; 4] = [1.0, 3.0, 6.0, 10.0];
        let mut total = 0.0;
        for a in &data {
            for b in &data {
                total += (a - b).abs();
            }
        }
        let expected = total / (2.0 * 16.0 * 5.0);
        assert!((gini(&data).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn mode_ties_first_seen() {
        assert_eq!(mode(&[1.0, 2.0, 2.0, 1.0]).unwrap(), vec![1.0, 2.0]);
        assert_eq!(mode(&[5.0, -0.0, 0.0]).unwrap(), vec![0.0]);
    }

    #[test]
    fn describe_single_value() {
        let s = describe(&[4.0]).unwrap();
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.iqr, 0.0);
        assert!(s.skewness.is_none());
        assert!(s.cv.is_none());
    }
}
