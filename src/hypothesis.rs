//! Hypothesis tests.
//!
//! Parametric tests (t, z, one-way ANOVA), the χ² test of independence and
//! the Mann–Whitney U rank test. Every test takes a significance level α
//! and reports `significant = p < α`.
//!
//! Too few observations is an [`StatError::InsufficientData`] error. A
//! degenerate input (zero standard error, zero within-group variance) is
//! not an error: the result carries `NaN` statistic and p-value and names
//! the reason in its `error` field.
//!
//! # Examples
//!
//! ```
//! use u_statlab::hypothesis::{t_test, TTest};
//!
//! let before = [72.0, 75.0, 71.0, 78.0, 74.0];
//! let after = [70.0, 72.0, 70.0, 74.0, 71.0];
//! let r = t_test(TTest::Paired { a: &before, b: &after }, 0.05).unwrap();
//! assert_eq!(r.df, 4.0);
//! assert!(r.significant);
//! ```

use serde::Serialize;

use crate::dataset::Cell;
use crate::error::{Degeneracy, StatError};
use crate::special::{
    chi_square_cdf, f_cdf, normal_cdf, normal_inverse, normal_two_sided_p, t_inverse,
    t_two_sided_p, upper_tail,
};
use crate::tables::contingency_table;
use crate::validation::{
    check_alpha, require_contingency, require_finite, require_groups, require_pairs,
};

// ── Ranks ─────────────────────────────────────────────────────────────

/// 1-based ranks with ties given the average of the ranks they span.
///
/// ```
/// use u_statlab::hypothesis::average_ranks;
///
/// assert_eq!(average_ranks(&[10.0, 20.0, 10.0, 30.0]), vec![1.5, 3.0, 1.5, 4.0]);
/// ```
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // Positions i..j share the average of ranks i+1..=j.
        let avg = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg;
        }
        i = j;
    }
    ranks
}

fn mean_var(x: &[f64]) -> (f64, f64) {
    let n = x.len() as f64;
    let mean = x.iter().sum::<f64>() / n;
    let var = if x.len() > 1 {
        x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
    } else {
        0.0
    };
    (mean, var)
}

// ── t-test ────────────────────────────────────────────────────────────

/// Input of [`t_test`].
#[derive(Debug, Clone, Copy)]
pub enum TTest<'a> {
    /// H₀: the population mean of `sample` equals `mu`.
    OneSample { sample: &'a [f64], mu: f64 },
    /// H₀: both populations share a mean. Welch's test unless
    /// `equal_variance` requests the pooled Student test.
    TwoSample {
        a: &'a [f64],
        b: &'a [f64],
        equal_variance: bool,
    },
    /// H₀: the mean of the differences `a − b` is zero.
    Paired { a: &'a [f64], b: &'a [f64] },
}

/// Variant of t-test that produced a [`TTestResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TTestKind {
    OneSample,
    Welch,
    Pooled,
    Paired,
}

/// Result of a t-test.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TTestResult {
    pub kind: TTestKind,
    pub t_statistic: f64,
    /// Degrees of freedom (fractional for Welch).
    pub df: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    pub alpha: f64,
    pub significant: bool,
    /// Estimated effect: x̄ − μ₀, x̄₁ − x̄₂ or the mean difference.
    pub mean_difference: f64,
    pub std_error: f64,
    /// Cohen's d (pooled standard deviation for two samples).
    pub cohens_d: f64,
    /// (1 − α) confidence interval of `mean_difference`.
    pub confidence_interval: [f64; 2],
    /// Sample means, one per input sample.
    pub means: Vec<f64>,
    /// Sample variances, one per input sample.
    pub variances: Vec<f64>,
    /// Finite observations per sample (pairs for the paired test).
    pub sizes: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Degeneracy>,
}

struct TCore {
    kind: TTestKind,
    estimate: f64,
    se: f64,
    df: f64,
    effect_scale: f64,
    means: Vec<f64>,
    variances: Vec<f64>,
    sizes: Vec<usize>,
}

impl TCore {
    fn finish(self, alpha: f64) -> Result<TTestResult, StatError> {
        if self.se == 0.0 {
            return Ok(TTestResult {
                kind: self.kind,
                t_statistic: f64::NAN,
                df: self.df,
                p_value: f64::NAN,
                alpha,
                significant: false,
                mean_difference: self.estimate,
                std_error: 0.0,
                cohens_d: f64::NAN,
                confidence_interval: [f64::NAN, f64::NAN],
                means: self.means,
                variances: self.variances,
                sizes: self.sizes,
                error: Some(Degeneracy::ZeroStandardError),
            });
        }

        let t = self.estimate / self.se;
        let p = t_two_sided_p(t, self.df);
        let crit = t_inverse(1.0 - alpha / 2.0, self.df)?;
        let cohens_d = if self.effect_scale > 0.0 {
            self.estimate / self.effect_scale
        } else {
            f64::NAN
        };

        Ok(TTestResult {
            kind: self.kind,
            t_statistic: t,
            df: self.df,
            p_value: p,
            alpha,
            significant: p < alpha,
            mean_difference: self.estimate,
            std_error: self.se,
            cohens_d,
            confidence_interval: [self.estimate - crit * self.se, self.estimate + crit * self.se],
            means: self.means,
            variances: self.variances,
            sizes: self.sizes,
            error: None,
        })
    }
}

/// Runs the t-test described by `test`.
///
/// # Errors
///
/// - [`StatError::InsufficientData`] when a sample has fewer than 2 finite
///   values (2 finite pairs for the paired test).
/// - [`StatError::DimensionMismatch`] for paired samples of unequal length.
/// - [`StatError::InvalidArgument`] when α ∉ (0, 1) or μ₀ is not finite.
pub fn t_test(test: TTest<'_>, alpha: f64) -> Result<TTestResult, StatError> {
    check_alpha(alpha)?;
    let core = match test {
        TTest::OneSample { sample, mu } => one_sample_core(sample, mu, TTestKind::OneSample)?,
        TTest::TwoSample {
            a,
            b,
            equal_variance,
        } => two_sample_core(a, b, equal_variance)?,
        TTest::Paired { a, b } => {
            let (xs, ys) = require_pairs(a, b, 2)?;
            let diffs: Vec<f64> = xs.iter().zip(&ys).map(|(x, y)| x - y).collect();
            one_sample_core(&diffs, 0.0, TTestKind::Paired)?
        }
    };
    core.finish(alpha)
}

/// One-sample t-test of H₀: μ = `mu`.
///
/// ```
/// use u_statlab::hypothesis::one_sample_t_test;
///
/// let r = one_sample_t_test(&[5.0, 5.0, 6.0, 6.0, 7.0, 7.0], 5.0, 0.05).unwrap();
/// assert!((r.t_statistic - 2.738_613).abs() < 1e-5);
/// assert_eq!(r.df, 5.0);
/// ```
pub fn one_sample_t_test(sample: &[f64], mu: f64, alpha: f64) -> Result<TTestResult, StatError> {
    t_test(TTest::OneSample { sample, mu }, alpha)
}

/// Two-sample t-test (Welch unless `equal_variance`).
pub fn two_sample_t_test(
    a: &[f64],
    b: &[f64],
    equal_variance: bool,
    alpha: f64,
) -> Result<TTestResult, StatError> {
    t_test(
        TTest::TwoSample {
            a,
            b,
            equal_variance,
        },
        alpha,
    )
}

/// Paired t-test on the differences `a − b`.
pub fn paired_t_test(a: &[f64], b: &[f64], alpha: f64) -> Result<TTestResult, StatError> {
    t_test(TTest::Paired { a, b }, alpha)
}

fn one_sample_core(sample: &[f64], mu: f64, kind: TTestKind) -> Result<TCore, StatError> {
    if !mu.is_finite() {
        return Err(StatError::invalid("mu", "must be finite"));
    }
    let x = require_finite(sample, 2)?;
    let n = x.len();
    let (mean, var) = mean_var(&x);
    let sd = var.sqrt();
    Ok(TCore {
        kind,
        estimate: mean - mu,
        se: sd / (n as f64).sqrt(),
        df: (n - 1) as f64,
        effect_scale: sd,
        means: vec![mean],
        variances: vec![var],
        sizes: vec![n],
    })
}

fn two_sample_core(a: &[f64], b: &[f64], equal_variance: bool) -> Result<TCore, StatError> {
    let x = require_finite(a, 2)?;
    let y = require_finite(b, 2)?;
    let (n1, n2) = (x.len() as f64, y.len() as f64);
    let (m1, v1) = mean_var(&x);
    let (m2, v2) = mean_var(&y);

    let pooled_var = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / (n1 + n2 - 2.0);
    let (kind, se, df) = if equal_variance {
        (
            TTestKind::Pooled,
            (pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt(),
            n1 + n2 - 2.0,
        )
    } else {
        let q1 = v1 / n1;
        let q2 = v2 / n2;
        let se2 = q1 + q2;
        let denom = q1 * q1 / (n1 - 1.0) + q2 * q2 / (n2 - 1.0);
        let df = if denom > 0.0 {
            se2 * se2 / denom
        } else {
            n1 + n2 - 2.0
        };
        (TTestKind::Welch, se2.sqrt(), df)
    };

    Ok(TCore {
        kind,
        estimate: m1 - m2,
        se,
        df,
        effect_scale: pooled_var.sqrt(),
        means: vec![m1, m2],
        variances: vec![v1, v2],
        sizes: vec![x.len(), y.len()],
    })
}

// ── z-test ────────────────────────────────────────────────────────────

/// Result of a one-sample z-test.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZTestResult {
    pub z_statistic: f64,
    pub p_value: f64,
    pub alpha: f64,
    pub significant: bool,
    pub mean: f64,
    pub std_error: f64,
    /// (1 − α) confidence interval of the mean.
    pub confidence_interval: [f64; 2],
    pub n: usize,
}

/// One-sample z-test with known population standard deviation.
///
/// # Errors
///
/// - [`StatError::NonPositiveValue`] when `population_std <= 0`.
/// - [`StatError::NoFiniteValues`] / [`StatError::InsufficientData`] for an empty sample.
///
/// ```
/// use u_statlab::hypothesis::z_test;
///
/// let r = z_test(&[102.0, 98.0, 105.0, 101.0], 100.0, 2.0, 0.05).unwrap();
/// assert!((r.z_statistic - 1.5).abs() < 1e-12);
/// assert!(!r.significant);
/// ```
pub fn z_test(
    sample: &[f64],
    mu: f64,
    population_std: f64,
    alpha: f64,
) -> Result<ZTestResult, StatError> {
    check_alpha(alpha)?;
    if !(population_std > 0.0) || !population_std.is_finite() {
        return Err(StatError::NonPositiveValue {
            value: population_std,
        });
    }
    let x = require_finite(sample, 1)?;
    let n = x.len();
    let mean = x.iter().sum::<f64>() / n as f64;
    let se = population_std / (n as f64).sqrt();
    let z = (mean - mu) / se;
    let p = normal_two_sided_p(z);
    let crit = normal_inverse(1.0 - alpha / 2.0)?;

    Ok(ZTestResult {
        z_statistic: z,
        p_value: p,
        alpha,
        significant: p < alpha,
        mean,
        std_error: se,
        confidence_interval: [mean - crit * se, mean + crit * se],
        n,
    })
}

// ── One-way ANOVA ─────────────────────────────────────────────────────

/// Result of a one-way ANOVA.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnovaResult {
    pub f_statistic: f64,
    pub p_value: f64,
    pub alpha: f64,
    pub significant: bool,
    pub df_between: f64,
    pub df_within: f64,
    pub ss_between: f64,
    pub ss_within: f64,
    pub ms_between: f64,
    pub ms_within: f64,
    /// η² = SS_B / SS_T.
    pub eta_squared: f64,
    pub grand_mean: f64,
    pub group_means: Vec<f64>,
    pub group_sizes: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Degeneracy>,
}

/// One-way ANOVA across `groups`.
///
/// # Errors
///
/// [`StatError::InsufficientData`] with fewer than two groups or a group
/// with fewer than two finite values.
///
/// ```
/// use u_statlab::hypothesis::one_way_anova;
///
/// let a = [1.0, 2.0, 3.0];
/// let b = [4.0, 5.0, 6.0];
/// let c = [7.0, 8.0, 9.0];
/// let r = one_way_anova(&[&a, &b, &c], 0.05).unwrap();
/// assert!((r.f_statistic - 27.0).abs() < 1e-10);
/// assert!(r.significant);
/// ```
pub fn one_way_anova(groups: &[&[f64]], alpha: f64) -> Result<AnovaResult, StatError> {
    check_alpha(alpha)?;
    let groups = require_groups(groups)?;

    let k = groups.len();
    let total_n: usize = groups.iter().map(Vec::len).sum();
    let grand_mean = groups.iter().flatten().sum::<f64>() / total_n as f64;

    let group_means: Vec<f64> = groups
        .iter()
        .map(|g| g.iter().sum::<f64>() / g.len() as f64)
        .collect();
    let group_sizes: Vec<usize> = groups.iter().map(Vec::len).collect();

    let ss_between: f64 = group_means
        .iter()
        .zip(&group_sizes)
        .map(|(m, &n)| n as f64 * (m - grand_mean).powi(2))
        .sum();
    let ss_within: f64 = groups
        .iter()
        .zip(&group_means)
        .map(|(g, m)| g.iter().map(|x| (x - m).powi(2)).sum::<f64>())
        .sum();

    let df_between = (k - 1) as f64;
    let df_within = (total_n - k) as f64;
    let ms_between = ss_between / df_between;
    let ms_within = ss_within / df_within;
    let ss_total = ss_between + ss_within;
    let eta_squared = if ss_total > 0.0 { ss_between / ss_total } else { 0.0 };

    let (f, p, error) = if ms_within == 0.0 {
        (f64::NAN, f64::NAN, Some(Degeneracy::ZeroWithinGroupVariance))
    } else {
        let f = ms_between / ms_within;
        (f, upper_tail(f_cdf(f, df_between, df_within)), None)
    };

    Ok(AnovaResult {
        f_statistic: f,
        p_value: p,
        alpha,
        significant: error.is_none() && p < alpha,
        df_between,
        df_within,
        ss_between,
        ss_within,
        ms_between,
        ms_within,
        eta_squared,
        grand_mean,
        group_means,
        group_sizes,
        error,
    })
}

// ── Chi-square independence ───────────────────────────────────────────

/// Result of a χ² test of independence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChiSquareResult {
    pub statistic: f64,
    pub df: f64,
    pub p_value: f64,
    pub alpha: f64,
    pub significant: bool,
    /// Cramér's V = √(χ² / (N·(min(r, c) − 1))).
    pub cramers_v: f64,
    /// Total observation count N.
    pub n: f64,
    pub observed: Vec<Vec<f64>>,
    pub expected: Vec<Vec<f64>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub row_labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub column_labels: Vec<String>,
    /// Non-fatal diagnostics such as low expected counts.
    pub warnings: Vec<String>,
}

/// χ² test of independence on a pre-built r×c table of counts.
///
/// Emits a warning when any expected count is below 5.
///
/// # Errors
///
/// - [`StatError::InsufficientData`] for fewer than 2 rows or columns.
/// - [`StatError::DimensionMismatch`] for ragged rows.
/// - [`StatError::InvalidArgument`] for negative or non-finite counts or a zero total.
///
/// ```
/// use u_statlab::hypothesis::chi_square_from_table;
///
/// let r = chi_square_from_table(&[vec![10.0, 20.0], vec![20.0, 10.0]], 0.05).unwrap();
/// assert!((r.statistic - 6.666_667).abs() < 1e-5);
/// assert_eq!(r.df, 1.0);
/// assert!(r.significant);
/// ```
pub fn chi_square_from_table(table: &[Vec<f64>], alpha: f64) -> Result<ChiSquareResult, StatError> {
    check_alpha(alpha)?;
    require_contingency(table)?;

    let rows = table.len();
    let cols = table[0].len();
    let row_totals: Vec<f64> = table.iter().map(|r| r.iter().sum()).collect();
    let col_totals: Vec<f64> = (0..cols).map(|j| table.iter().map(|r| r[j]).sum()).collect();
    let n: f64 = row_totals.iter().sum();

    let mut warnings = Vec::new();
    let mut statistic = 0.0;
    let mut expected = vec![vec![0.0; cols]; rows];
    let mut low_cells = 0;
    for i in 0..rows {
        for j in 0..cols {
            let e = row_totals[i] * col_totals[j] / n;
            expected[i][j] = e;
            if e < 5.0 {
                low_cells += 1;
            }
            if e > 0.0 {
                statistic += (table[i][j] - e).powi(2) / e;
            }
        }
    }
    if low_cells > 0 {
        warnings.push(format!(
            "{low_cells} of {} cells have an expected count below 5; the chi-square approximation may be unreliable",
            rows * cols
        ));
    }

    let df = ((rows - 1) * (cols - 1)) as f64;
    let p = upper_tail(chi_square_cdf(statistic, df));
    let min_dim = rows.min(cols) as f64;
    let cramers_v = (statistic / (n * (min_dim - 1.0))).sqrt();

    Ok(ChiSquareResult {
        statistic,
        df,
        p_value: p,
        alpha,
        significant: p < alpha,
        cramers_v,
        n,
        observed: table.to_vec(),
        expected,
        row_labels: Vec::new(),
        column_labels: Vec::new(),
        warnings,
    })
}

/// χ² test of independence between two parallel categorical columns.
///
/// Rows where either cell is null are skipped.
///
/// ```
/// use u_statlab::dataset::Cell;
/// use u_statlab::hypothesis::chi_square_independence;
///
/// let a: Vec<Cell> = ["x", "x", "y", "y"].iter().map(|&s| Cell::from(s)).collect();
/// let b: Vec<Cell> = ["p", "q", "p", "q"].iter().map(|&s| Cell::from(s)).collect();
/// let a: Vec<&Cell> = a.iter().collect();
/// let b: Vec<&Cell> = b.iter().collect();
/// let r = chi_square_independence(&a, &b, 0.05).unwrap();
/// assert_eq!(r.statistic, 0.0);
/// assert_eq!(r.row_labels, vec!["x", "y"]);
/// ```
pub fn chi_square_independence(
    a: &[&Cell],
    b: &[&Cell],
    alpha: f64,
) -> Result<ChiSquareResult, StatError> {
    let table = contingency_table(a, b)?;
    let mut result = chi_square_from_table(&table.counts, alpha)?;
    result.row_labels = table.row_labels;
    result.column_labels = table.column_labels;
    Ok(result)
}

// ── Mann–Whitney U ────────────────────────────────────────────────────

/// Result of a Mann–Whitney U test.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MannWhitneyResult {
    /// min(U₁, U₂).
    pub u_statistic: f64,
    pub u1: f64,
    pub u2: f64,
    pub rank_sum1: f64,
    pub rank_sum2: f64,
    pub z_statistic: f64,
    pub p_value: f64,
    pub alpha: f64,
    pub significant: bool,
    /// Rank-biserial style effect size r = |z| / √N.
    pub effect_size: f64,
    pub n1: usize,
    pub n2: usize,
}

/// Mann–Whitney U test with the normal approximation (no tie correction).
///
/// # Errors
///
/// [`StatError::InsufficientData`] when either sample has no finite values.
///
/// ```
/// use u_statlab::hypothesis::mann_whitney_u;
///
/// let r = mann_whitney_u(&[1.0, 3.0, 5.0, 7.0], &[2.0, 4.0, 6.0, 8.0], 0.05).unwrap();
/// assert_eq!(r.u1, 6.0);
/// assert_eq!(r.u2, 10.0);
/// assert_eq!(r.u_statistic, 6.0);
/// ```
pub fn mann_whitney_u(a: &[f64], b: &[f64], alpha: f64) -> Result<MannWhitneyResult, StatError> {
    check_alpha(alpha)?;
    let x = require_finite(a, 1)?;
    let y = require_finite(b, 1)?;
    let (n1, n2) = (x.len(), y.len());

    let combined: Vec<f64> = x.iter().chain(&y).copied().collect();
    let ranks = average_ranks(&combined);
    let rank_sum1: f64 = ranks[..n1].iter().sum();
    let rank_sum2: f64 = ranks[n1..].iter().sum();

    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let u1 = rank_sum1 - n1f * (n1f + 1.0) / 2.0;
    let u2 = n1f * n2f - u1;
    let u = u1.min(u2);

    let mu = n1f * n2f / 2.0;
    let sigma = (n1f * n2f * (n1f + n2f + 1.0) / 12.0).sqrt();
    let z = (u - mu) / sigma;
    let p = (2.0 * upper_tail(normal_cdf(z.abs()))).min(1.0);

    Ok(MannWhitneyResult {
        u_statistic: u,
        u1,
        u2,
        rank_sum1,
        rank_sum2,
        z_statistic: z,
        p_value: p,
        alpha,
        significant: p < alpha,
        effect_size: z.abs() / (n1f + n2f).sqrt(),
        n1,
        n2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_with_ties() {
        assert_eq!(average_ranks(&[]), Vec::<f64>::new());
        assert_eq!(average_ranks(&[3.0, 3.0, 3.0]), vec![2.0, 2.0, 2.0]);
        assert_eq!(average_ranks(&[2.0, 1.0]), vec![2.0, 1.0]);
    }

    #[test]
    fn one_sample_reference() {
        let r = one_sample_t_test(&[5.0, 5.0, 6.0, 6.0, 7.0, 7.0], 5.0, 0.05).unwrap();
        assert_eq!(r.kind, TTestKind::OneSample);
        assert!((r.t_statistic - 2.738_613).abs() < 1e-5);
        assert!((r.p_value - 0.040_9).abs() < 1e-3);
        assert!(r.significant);
        assert!(r.confidence_interval[0] > 0.0);
        assert!((r.cohens_d - 1.0 / 0.894_427).abs() < 1e-4);
    }

    #[test]
    fn one_sample_zero_variance_sentinel() {
        let r = one_sample_t_test(&[3.0, 3.0, 3.0], 2.0, 0.05).unwrap();
        assert!(r.t_statistic.is_nan());
        assert!(r.p_value.is_nan());
        assert!(!r.significant);
        assert_eq!(r.error, Some(Degeneracy::ZeroStandardError));
    }

    #[test]
    fn one_sample_guards() {
        assert!(matches!(
            one_sample_t_test(&[1.0], 0.0, 0.05),
            Err(StatError::InsufficientData { .. })
        ));
        assert!(one_sample_t_test(&[1.0, 2.0], f64::NAN, 0.05).is_err());
        assert!(one_sample_t_test(&[1.0, 2.0], 0.0, 0.0).is_err());
    }

    #[test]
    fn welch_versus_pooled() {
        let a = [19.8, 20.4, 19.6, 17.8, 18.5, 18.9, 18.3, 18.9, 19.5, 22.0];
        let b = [
            28.2, 26.6, 20.1, 23.3, 25.2, 22.1, 17.7, 27.6, 20.6, 13.7, 23.2, 17.5, 20.6, 18.0,
            23.9, 21.6, 24.3, 20.4, 23.9, 13.3,
        ];
        let welch = two_sample_t_test(&a, &b, false, 0.05).unwrap();
        let pooled = two_sample_t_test(&a, &b, true, 0.05).unwrap();
        assert_eq!(welch.kind, TTestKind::Welch);
        assert_eq!(pooled.df, 28.0);
        // Welch df lies between min(n) − 1 and n₁ + n₂ − 2.
        assert!(welch.df > 9.0 && welch.df < 28.0);
        assert!((welch.mean_difference - pooled.mean_difference).abs() < 1e-12);
        assert!(welch.p_value > 0.0 && welch.p_value < 1.0);
    }

    #[test]
    fn paired_matches_one_sample_on_differences() {
        let a = [10.0, 12.0, 9.0, 15.0, 11.0];
        let b = [9.0, 11.5, 9.5, 13.0, 10.0];
        let paired = paired_t_test(&a, &b, 0.05).unwrap();
        let diffs: Vec<f64> = a.iter().zip(&b).map(|(x, y)| x - y).collect();
        let one = one_sample_t_test(&diffs, 0.0, 0.05).unwrap();
        assert_eq!(paired.kind, TTestKind::Paired);
        assert_eq!(paired.t_statistic, one.t_statistic);
        assert_eq!(paired.df, one.df);
        assert_eq!(paired.p_value, one.p_value);
    }

    #[test]
    fn paired_length_mismatch() {
        assert!(matches!(
            paired_t_test(&[1.0, 2.0], &[1.0], 0.05),
            Err(StatError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn z_test_requires_positive_sigma() {
        assert!(matches!(
            z_test(&[1.0], 0.0, 0.0, 0.05),
            Err(StatError::NonPositiveValue { .. })
        ));
        let r = z_test(&[1.0, 2.0, 3.0], 0.0, 1.0, 0.05).unwrap();
        assert!(r.significant);
        assert!(r.confidence_interval[0] < 2.0 && r.confidence_interval[1] > 2.0);
    }

    #[test]
    fn anova_effect_size() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        let c = [7.0, 8.0, 9.0];
        let r = one_way_anova(&[&a, &b, &c], 0.05).unwrap();
        assert_eq!(r.df_between, 2.0);
        assert_eq!(r.df_within, 6.0);
        assert!((r.ss_between - 54.0).abs() < 1e-10);
        assert!((r.ss_within - 6.0).abs() < 1e-10);
        assert!((r.eta_squared - 0.9).abs() < 1e-10);
        assert!(r.p_value < 0.01);
        assert_eq!(r.group_means, vec![2.0, 5.0, 8.0]);
    }

    #[test]
    fn anova_zero_within_variance() {
        let r = one_way_anova(&[&[1.0, 1.0], &[2.0, 2.0]], 0.05).unwrap();
        assert!(r.f_statistic.is_nan());
        assert_eq!(r.error, Some(Degeneracy::ZeroWithinGroupVariance));
        assert!(!r.significant);
    }

    #[test]
    fn anova_small_group() {
        assert!(one_way_anova(&[&[1.0, 2.0], &[3.0]], 0.05).is_err());
    }

    #[test]
    fn chi_square_reference() {
        let r = chi_square_from_table(&[vec![10.0, 20.0], vec![20.0, 10.0]], 0.05).unwrap();
        assert!((r.statistic - 20.0 / 3.0).abs() < 1e-10);
        assert!((r.p_value - 0.009_823).abs() < 1e-4);
        assert!((r.cramers_v - (20.0f64 / 3.0 / 60.0).sqrt()).abs() < 1e-10);
        assert!(r.warnings.is_empty());
        assert_eq!(r.expected[0][0], 15.0);
    }

    #[test]
    fn chi_square_low_expected_warns() {
        let r = chi_square_from_table(&[vec![1.0, 2.0], vec![3.0, 1.0]], 0.05).unwrap();
        assert_eq!(r.warnings.len(), 1);
        assert!(r.p_value >= 0.0 && r.p_value <= 1.0);
    }

    #[test]
    fn chi_square_from_cells() {
        let a: Vec<Cell> = vec!["m".into(), "f".into(), "m".into(), Cell::Null, "f".into()];
        let b: Vec<Cell> = vec!["y".into(), "n".into(), "y".into(), "n".into(), "y".into()];
        let ar: Vec<&Cell> = a.iter().collect();
        let br: Vec<&Cell> = b.iter().collect();
        let r = chi_square_independence(&ar, &br, 0.05).unwrap();
        assert_eq!(r.n, 4.0);
        assert_eq!(r.row_labels, vec!["m", "f"]);
        assert_eq!(r.column_labels, vec!["y", "n"]);
        assert_eq!(r.observed, vec![vec![2.0, 0.0], vec![1.0, 1.0]]);
    }

    #[test]
    fn mann_whitney_separated_samples() {
        let a: Vec<f64> = (1..=20).map(f64::from).collect();
        let b: Vec<f64> = (21..=40).map(f64::from).collect();
        let r = mann_whitney_u(&a, &b, 0.05).unwrap();
        assert_eq!(r.u_statistic, 0.0);
        assert!(r.significant);
        assert_eq!(r.rank_sum1 + r.rank_sum2, 40.0 * 41.0 / 2.0);
    }

    #[test]
    fn mann_whitney_empty_sample() {
        assert!(mann_whitney_u(&[], &[1.0], 0.05).is_err());
    }
}
