//! Bootstrap estimation and row sampling.
//!
//! Both take an explicit seed, so equal inputs give equal outputs.
//!
//! ```
//! use u_statlab::descriptive::mean;
//! use u_statlab::resampling::{bootstrap, BootstrapConfig};
//!
//! let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
//! let config = BootstrapConfig::default().iterations(500);
//! let result = bootstrap(&data, mean, &config).unwrap();
//! assert_eq!(result.estimate, 5.0);
//! assert!(result.confidence_interval[0] < 5.0 && 5.0 < result.confidence_interval[1]);
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::descriptive::{quantile_sorted, Estimator};
use crate::error::StatError;
use crate::validation::{check_confidence, require_finite};

// ── Bootstrap ─────────────────────────────────────────────────────────

/// Configuration for [`bootstrap`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootstrapConfig {
    /// Number of resamples. Default: 1000.
    pub iterations: usize,
    /// Confidence level of the percentile interval. Default: 0.95.
    pub confidence: f64,
    /// Random seed. Default: 42.
    pub seed: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            confidence: 0.95,
            seed: 42,
        }
    }
}

impl BootstrapConfig {
    /// Sets the number of resamples.
    pub fn iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    /// Sets the confidence level.
    pub fn confidence(mut self, c: f64) -> Self {
        self.confidence = c;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Bootstrap distribution summary of a statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapResult {
    /// Statistic on the original sample.
    pub estimate: f64,
    /// Mean of the resampled statistics.
    pub mean: f64,
    /// Standard deviation of the resampled statistics.
    pub standard_error: f64,
    /// Percentile interval, e.g. the 2.5th and 97.5th percentiles at 95%.
    pub confidence_interval: [f64; 2],
    pub confidence: f64,
    pub iterations: usize,
}

/// Resamples `data` with replacement and summarises `statistic` over the
/// resamples.
///
/// # Errors
///
/// - [`StatError::InsufficientData`] without at least two finite values.
/// - [`StatError::InvalidArgument`] for zero iterations or a confidence
///   level outside (0, 1).
/// - Any error `statistic` returns.
pub fn bootstrap<F>(
    data: &[f64],
    statistic: F,
    config: &BootstrapConfig,
) -> Result<BootstrapResult, StatError>
where
    F: Fn(&[f64]) -> Result<f64, StatError>,
{
    let values = require_finite(data, 2)?;
    check_confidence(config.confidence)?;
    if config.iterations == 0 {
        return Err(StatError::invalid("iterations", "must be positive"));
    }

    let estimate = statistic(&values)?;
    let n = values.len();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut resample = vec![0.0; n];
    let mut stats = Vec::with_capacity(config.iterations);
    for _ in 0..config.iterations {
        for slot in resample.iter_mut() {
            *slot = values[rng.random_range(0..n)];
        }
        stats.push(statistic(&resample)?);
    }

    let mean = stats.iter().sum::<f64>() / stats.len() as f64;
    let standard_error = if stats.len() > 1 {
        crate::descriptive::std_dev(&stats, Estimator::Sample)?
    } else {
        0.0
    };
    stats.sort_by(|a, b| a.total_cmp(b));
    let tail = (1.0 - config.confidence) / 2.0;

    Ok(BootstrapResult {
        estimate,
        mean,
        standard_error,
        confidence_interval: [
            quantile_sorted(&stats, tail),
            quantile_sorted(&stats, 1.0 - tail),
        ],
        confidence: config.confidence,
        iterations: config.iterations,
    })
}

// ── Sampling ──────────────────────────────────────────────────────────

/// How rows are chosen by [`sample_indices`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMethod {
    /// Uniform without replacement.
    Random,
    /// Every ⌊n/k⌋-th row starting at the first.
    Systematic,
    /// The first k rows.
    First,
    /// The last k rows.
    Last,
}

/// Picks `k` of `n` row indices; `k` is clamped to `n`.
///
/// Random sampling is a partial Fisher–Yates shuffle, so indices come back
/// in draw order. The other methods return ascending indices.
///
/// ```
/// use u_statlab::resampling::{sample_indices, SamplingMethod};
///
/// assert_eq!(sample_indices(10, 3, SamplingMethod::Systematic, 0), vec![0, 3, 6]);
/// assert_eq!(sample_indices(5, 2, SamplingMethod::Last, 0), vec![3, 4]);
/// assert_eq!(sample_indices(3, 10, SamplingMethod::First, 0), vec![0, 1, 2]);
/// ```
pub fn sample_indices(n: usize, k: usize, method: SamplingMethod, seed: u64) -> Vec<usize> {
    let k = k.min(n);
    if k == 0 {
        return Vec::new();
    }
    match method {
        SamplingMethod::Random => {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut indices: Vec<usize> = (0..n).collect();
            for i in 0..k {
                let j = rng.random_range(i..n);
                indices.swap(i, j);
            }
            indices.truncate(k);
            indices
        }
        SamplingMethod::Systematic => {
            let step = (n / k).max(1);
            (0..k).map(|i| i * step).collect()
        }
        SamplingMethod::First => (0..k).collect(),
        SamplingMethod::Last => (n - k..n).collect(),
    }
}

/// Draws a `k`-row sample of `dataset` as a new dataset.
pub fn sample_dataset(dataset: &Dataset, k: usize, method: SamplingMethod, seed: u64) -> Dataset {
    dataset.select_rows(&sample_indices(dataset.row_count(), k, method, seed))
}
