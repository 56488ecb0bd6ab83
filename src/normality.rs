//! Normality tests.
//!
//! Six tests share one result shape, [`NormalityResult`]. Each takes a
//! sample (non-finite values are dropped) and a significance level α, and
//! reports `is_normal = p > α`.
//!
//! | Test | Function | Valid n |
//! |------|----------|---------|
//! | Shapiro–Wilk | [`shapiro_wilk`] | 3..=5000 |
//! | Jarque–Bera | [`jarque_bera`] | ≥ 4 |
//! | Kolmogorov–Smirnov | [`kolmogorov_smirnov`] | ≥ 5 |
//! | Anderson–Darling | [`anderson_darling`] | ≥ 8 |
//! | Lilliefors | [`lilliefors`] | 4..=1000 |
//! | D'Agostino K² | [`dagostino_k2`] | ≥ 20 |
//!
//! A sample that is too small is an [`StatError::InsufficientData`] error.
//! A degenerate sample (all values equal) is not an error: the result has
//! `NaN` statistic and p-value and its `error` field names the reason.
//!
//! [`normality_battery`] runs several tests at once and forms a majority
//! verdict.
//!
//! ```
//! use u_statlab::normality::shapiro_wilk;
//!
//! let data = [-1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5];
//! let r = shapiro_wilk(&data, 0.05).unwrap();
//! assert!(r.statistic > 0.9);
//! assert!(r.is_normal);
//! ```

use std::f64::consts::PI;

use serde::Serialize;

use crate::descriptive::sorted_finite;
use crate::error::{Degeneracy, StatError};
use crate::special::{chi_square_cdf, normal_cdf, normal_inverse, upper_tail};
use crate::validation::check_alpha;

// ── Result Types ──────────────────────────────────────────────────────

/// Identifies a normality test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalityTest {
    ShapiroWilk,
    JarqueBera,
    KolmogorovSmirnov,
    AndersonDarling,
    Lilliefors,
    #[serde(rename = "dagostino_k2")]
    DAgostinoK2,
}

impl NormalityTest {
    /// Human-readable test name.
    pub fn name(self) -> &'static str {
        match self {
            Self::ShapiroWilk => "Shapiro-Wilk",
            Self::JarqueBera => "Jarque-Bera",
            Self::KolmogorovSmirnov => "Kolmogorov-Smirnov",
            Self::AndersonDarling => "Anderson-Darling",
            Self::Lilliefors => "Lilliefors",
            Self::DAgostinoK2 => "D'Agostino K-squared",
        }
    }
}

/// Outcome of a single normality test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalityResult {
    pub test: NormalityTest,
    /// Test statistic (W, JB, D, A²*, D or K²). `NaN` when degenerate.
    pub statistic: f64,
    /// P-value in [0, 1]. `NaN` when degenerate.
    pub p_value: f64,
    pub alpha: f64,
    /// `p_value > alpha`; always `false` for degenerate samples.
    pub is_normal: bool,
    /// Number of finite observations used.
    pub n: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Degeneracy>,
}

impl NormalityResult {
    fn new(test: NormalityTest, statistic: f64, p_value: f64, alpha: f64, n: usize) -> Self {
        let p_value = p_value.clamp(0.0, 1.0);
        Self {
            test,
            statistic,
            p_value,
            alpha,
            is_normal: p_value > alpha,
            n,
            error: None,
        }
    }

    fn degenerate(test: NormalityTest, alpha: f64, n: usize, reason: Degeneracy) -> Self {
        Self {
            test,
            statistic: f64::NAN,
            p_value: f64::NAN,
            alpha,
            is_normal: false,
            n,
            error: Some(reason),
        }
    }

    /// Returns `true` when the result carries a statistic.
    pub fn is_usable(&self) -> bool {
        self.error.is_none()
    }
}

// ── Helpers ───────────────────────────────────────────────────────────

/// Sorted finite values with a sample-size range check.
fn prepare(data: &[f64], min: usize, max: Option<usize>) -> Result<Vec<f64>, StatError> {
    let sorted = match sorted_finite(data) {
        Ok(v) => v,
        Err(StatError::NoFiniteValues) => Vec::new(),
        Err(e) => return Err(e),
    };
    let n = sorted.len();
    if n < min {
        return Err(StatError::InsufficientData {
            min_required: min,
            actual: n,
        });
    }
    if let Some(max) = max {
        if n > max {
            return Err(StatError::invalid(
                "data",
                format!("sample size {n} exceeds the supported maximum of {max}"),
            ));
        }
    }
    Ok(sorted)
}

/// Mean and sample standard deviation.
fn mean_sd(x: &[f64]) -> (f64, f64) {
    let n = x.len() as f64;
    let mean = x.iter().sum::<f64>() / n;
    let ss: f64 = x.iter().map(|v| (v - mean).powi(2)).sum();
    (mean, (ss / (n - 1.0)).sqrt())
}

/// Population central moments m2, m3, m4.
fn moments(x: &[f64]) -> (f64, f64, f64) {
    let n = x.len() as f64;
    let mean = x.iter().sum::<f64>() / n;
    let (s2, s3, s4) = x.iter().fold((0.0, 0.0, 0.0), |(s2, s3, s4), v| {
        let d = v - mean;
        let d2 = d * d;
        (s2 + d2, s3 + d2 * d, s4 + d2 * d2)
    });
    (s2 / n, s3 / n, s4 / n)
}

fn is_constant(sorted: &[f64]) -> bool {
    sorted[sorted.len() - 1] - sorted[0] == 0.0
}

/// Evaluates c[0] + c[1]x + c[2]x² + … by Horner's rule.
fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci)
}

/// Kolmogorov D statistic of a sorted sample against N(mean, sd).
fn ks_distance(sorted: &[f64], mean: f64, sd: f64) -> f64 {
    let n = sorted.len() as f64;
    sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let f = normal_cdf((x - mean) / sd);
            let upper = (i as f64 + 1.0) / n - f;
            let lower = f - i as f64 / n;
            upper.abs().max(lower.abs())
        })
        .fold(0.0, f64::max)
}

// ── Shapiro–Wilk ──────────────────────────────────────────────────────

/// Leading coefficient a_n for n = 2..=11, indexed by n − 1.
const SW_LEADING: [f64; 11] = [
    0.0, 0.7071, 0.7071, 0.6872, 0.6646, 0.6431, 0.6233, 0.6052, 0.5888, 0.5739, 0.5601,
];

// Royston's transforms of W (coefficients in ascending powers)
const SW_SMALL_GAMMA: [f64; 2] = [-2.273, 0.459];
const SW_SMALL_MU: [f64; 4] = [0.5440, -0.39978, 0.025054, -0.0006714];
const SW_SMALL_SIGMA: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const SW_LARGE_MU: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const SW_LARGE_SIGMA: [f64; 3] = [-0.4803, -0.082676, 0.0030302];

/// Shapiro–Wilk W test.
///
/// Coefficients come from Blom scores mᵢ = Φ⁻¹((i − 0.375)/(n + 0.25)). For
/// 4 ≤ n ≤ 10 the extreme coefficient is taken from a fixed table and the
/// inner ones are rescaled to unit norm; for n > 10 the coefficients are the
/// normalized scores. The p-value follows Royston (1995, AS R94): log-normal
/// transforms of 1 − W in the n ≤ 11 and n ≥ 12 regimes, and the exact
/// distribution for n = 3. It does not use the cruder single-formula
/// approximation z = −(0.459n − 2.273)·ln W for small n, so small-sample
/// p-values differ from tools built on that shortcut.
///
/// # Errors
///
/// - [`StatError::InsufficientData`] for n < 3.
/// - [`StatError::InvalidArgument`] for n > 5000 or α ∉ (0, 1).
///
/// ```
/// use u_statlab::normality::shapiro_wilk;
///
/// let r = shapiro_wilk(&[1.0, 2.0, 3.0], 0.05).unwrap();
/// assert!((r.statistic - 1.0).abs() < 1e-12);
/// assert!((r.p_value - 1.0).abs() < 1e-6);
/// ```
pub fn shapiro_wilk(data: &[f64], alpha: f64) -> Result<NormalityResult, StatError> {
    check_alpha(alpha)?;
    let test = NormalityTest::ShapiroWilk;
    let x = prepare(data, 3, Some(5000))?;
    let n = x.len();
    if is_constant(&x) {
        return Ok(NormalityResult::degenerate(test, alpha, n, Degeneracy::ConstantSample));
    }

    let a = sw_coefficients(n)?;
    let mean = x.iter().sum::<f64>() / n as f64;
    let ss: f64 = x.iter().map(|v| (v - mean).powi(2)).sum();
    let numerator: f64 = a.iter().zip(&x).map(|(ai, xi)| ai * xi).sum();
    let w = (numerator * numerator / ss).min(1.0);

    Ok(NormalityResult::new(test, w, sw_p_value(w, n), alpha, n))
}

/// Full antisymmetric coefficient vector a₁..aₙ (a₁ < 0 < aₙ).
fn sw_coefficients(n: usize) -> Result<Vec<f64>, StatError> {
    if n == 3 {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        return Ok(vec![-h, 0.0, h]);
    }

    let nf = n as f64;
    let m = (1..=n)
        .map(|i| normal_inverse((i as f64 - 0.375) / (nf + 0.25)))
        .collect::<Result<Vec<f64>, StatError>>()?;
    let mm: f64 = m.iter().map(|v| v * v).sum();

    if n <= 10 {
        let an = SW_LEADING[n - 1];
        let phi = (mm - 2.0 * m[n - 1] * m[n - 1]) / (1.0 - 2.0 * an * an);
        let scale = phi.sqrt();
        let mut a: Vec<f64> = m.iter().map(|mi| mi / scale).collect();
        a[0] = -an;
        a[n - 1] = an;
        Ok(a)
    } else {
        let norm = mm.sqrt();
        Ok(m.iter().map(|mi| mi / norm).collect())
    }
}

fn sw_p_value(w: f64, n: usize) -> f64 {
    if n == 3 {
        let p = 6.0 / PI * (w.sqrt().asin() - 0.75f64.sqrt().asin());
        return p.clamp(0.0, 1.0);
    }

    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return 1.0;
    }
    let y = w1.ln();
    let nf = n as f64;

    let z = if n <= 11 {
        let gamma = poly(&SW_SMALL_GAMMA, nf);
        if y >= gamma {
            return 0.0;
        }
        let w_prime = -(gamma - y).ln();
        (w_prime - poly(&SW_SMALL_MU, nf)) / poly(&SW_SMALL_SIGMA, nf).exp()
    } else {
        let ln_n = nf.ln();
        (y - poly(&SW_LARGE_MU, ln_n)) / poly(&SW_LARGE_SIGMA, ln_n).exp()
    };
    upper_tail(normal_cdf(z))
}

// ── Jarque–Bera ───────────────────────────────────────────────────────

/// Jarque–Bera test from bias-corrected skewness G₁ and excess kurtosis G₂.
///
/// JB = (n/6)(G₁² + G₂²/4), compared against χ²(2).
///
/// # Errors
///
/// [`StatError::InsufficientData`] for n < 4.
pub fn jarque_bera(data: &[f64], alpha: f64) -> Result<NormalityResult, StatError> {
    check_alpha(alpha)?;
    let test = NormalityTest::JarqueBera;
    let x = prepare(data, 4, None)?;
    let n = x.len();
    if is_constant(&x) {
        return Ok(NormalityResult::degenerate(test, alpha, n, Degeneracy::ConstantSample));
    }

    let nf = n as f64;
    let (m2, m3, m4) = moments(&x);
    let g1 = m3 / m2.powf(1.5);
    let g2 = m4 / (m2 * m2) - 3.0;
    let skew = g1 * (nf * (nf - 1.0)).sqrt() / (nf - 2.0);
    let kurt = ((nf + 1.0) * g2 + 6.0) * (nf - 1.0) / ((nf - 2.0) * (nf - 3.0));

    let jb = nf / 6.0 * (skew * skew + kurt * kurt / 4.0);
    let p = upper_tail(chi_square_cdf(jb, 2.0));
    Ok(NormalityResult::new(test, jb, p, alpha, n))
}

// ── Kolmogorov–Smirnov ────────────────────────────────────────────────

/// One-sample Kolmogorov–Smirnov test against N(x̄, s).
///
/// The p-value is the asymptotic Kolmogorov series
/// Σ 2(−1)^(k−1) exp(−2k²λ²) with λ = D√n. When the series has not
/// converged after 100 terms (very small λ) the p-value is 1.
///
/// # Errors
///
/// [`StatError::InsufficientData`] for n < 5.
pub fn kolmogorov_smirnov(data: &[f64], alpha: f64) -> Result<NormalityResult, StatError> {
    check_alpha(alpha)?;
    let test = NormalityTest::KolmogorovSmirnov;
    let x = prepare(data, 5, None)?;
    let n = x.len();
    if is_constant(&x) {
        return Ok(NormalityResult::degenerate(test, alpha, n, Degeneracy::ConstantSample));
    }

    let (mean, sd) = mean_sd(&x);
    let d = ks_distance(&x, mean, sd);
    let p = kolmogorov_p(d * (n as f64).sqrt());
    Ok(NormalityResult::new(test, d, p, alpha, n))
}

fn kolmogorov_p(lambda: f64) -> f64 {
    let mut sum = 0.0;
    for k in 1..=100 {
        let kf = k as f64;
        let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
        let term = 2.0 * sign * (-2.0 * kf * kf * lambda * lambda).exp();
        sum += term;
        if term.abs() < 1e-12 {
            return sum.clamp(0.0, 1.0);
        }
    }
    1.0
}

// ── Anderson–Darling ──────────────────────────────────────────────────

/// Anderson–Darling test with Stephens' small-sample adjustment.
///
/// The reported statistic is A²* = A²(1 + 0.75/n + 2.25/n²); the p-value is
/// the D'Agostino–Stephens piecewise approximation in A²*.
///
/// # Errors
///
/// [`StatError::InsufficientData`] for n < 8.
///
/// ```
/// use u_statlab::normality::anderson_darling;
///
/// let data = [-1.5, -1.0, -0.5, 0.0, 0.0, 0.5, 1.0, 1.5];
/// let r = anderson_darling(&data, 0.05).unwrap();
/// assert!(r.p_value > 0.05);
/// ```
pub fn anderson_darling(data: &[f64], alpha: f64) -> Result<NormalityResult, StatError> {
    check_alpha(alpha)?;
    let test = NormalityTest::AndersonDarling;
    let x = prepare(data, 8, None)?;
    let n = x.len();
    if is_constant(&x) {
        return Ok(NormalityResult::degenerate(test, alpha, n, Degeneracy::ConstantSample));
    }

    let nf = n as f64;
    let (mean, sd) = mean_sd(&x);
    let s: f64 = (0..n)
        .map(|i| {
            let lower = normal_cdf((x[i] - mean) / sd).max(f64::MIN_POSITIVE);
            let upper = normal_cdf(-(x[n - 1 - i] - mean) / sd).max(f64::MIN_POSITIVE);
            (2.0 * i as f64 + 1.0) * (lower.ln() + upper.ln())
        })
        .sum();

    let a2 = -nf - s / nf;
    let a2_star = a2 * (1.0 + 0.75 / nf + 2.25 / (nf * nf));
    Ok(NormalityResult::new(test, a2_star, anderson_darling_p(a2_star), alpha, n))
}

fn anderson_darling_p(a: f64) -> f64 {
    let p = if a >= 10.0 {
        0.0
    } else if a >= 0.6 {
        (1.2937 - 5.709 * a + 0.0186 * a * a).exp()
    } else if a > 0.34 {
        (0.9177 - 4.279 * a - 1.38 * a * a).exp()
    } else if a > 0.2 {
        1.0 - (-8.318 + 42.796 * a - 59.938 * a * a).exp()
    } else {
        1.0 - (-13.436 + 101.14 * a - 223.73 * a * a).exp()
    };
    p.clamp(0.0, 1.0)
}

// ── Lilliefors ────────────────────────────────────────────────────────

/// Lilliefors critical values (n, D at α = 0.05, D at α = 0.01).
const LILLIEFORS_TABLE: [(usize, f64, f64); 19] = [
    (4, 0.381, 0.417),
    (5, 0.337, 0.405),
    (6, 0.319, 0.364),
    (7, 0.300, 0.348),
    (8, 0.285, 0.331),
    (9, 0.271, 0.311),
    (10, 0.258, 0.294),
    (11, 0.249, 0.284),
    (12, 0.242, 0.275),
    (13, 0.234, 0.268),
    (14, 0.227, 0.261),
    (15, 0.220, 0.257),
    (16, 0.213, 0.250),
    (17, 0.206, 0.245),
    (18, 0.200, 0.239),
    (19, 0.195, 0.235),
    (20, 0.190, 0.231),
    (25, 0.173, 0.200),
    (30, 0.161, 0.187),
];

/// Critical values (α = 0.05, α = 0.01) for sample size `n`.
///
/// Linear interpolation between tabulated sizes; 0.886/√n and 1.031/√n
/// beyond the table.
pub fn lilliefors_critical_values(n: usize) -> (f64, f64) {
    let last = LILLIEFORS_TABLE[LILLIEFORS_TABLE.len() - 1];
    if n > last.0 {
        let root = (n as f64).sqrt();
        return (0.886 / root, 1.031 / root);
    }
    let mut prev = LILLIEFORS_TABLE[0];
    for &row in &LILLIEFORS_TABLE {
        if row.0 == n {
            return (row.1, row.2);
        }
        if row.0 > n {
            let t = (n - prev.0) as f64 / (row.0 - prev.0) as f64;
            return (prev.1 + t * (row.1 - prev.1), prev.2 + t * (row.2 - prev.2));
        }
        prev = row;
    }
    (last.1, last.2)
}

/// Lilliefors test: the KS distance against a fitted normal, judged by
/// tabulated critical values.
///
/// The p-value is banded: 0.01 when D exceeds the 1% critical value, 0.05
/// when it exceeds the 5% value, 0.20 otherwise.
///
/// Critical values are Lilliefors' published table for n = 4…30 with linear
/// interpolation between tabulated sizes. From n = 31 on the asymptotic
/// 0.886/√n (5%) and 1.031/√n (1%) are used instead of an extended table;
/// they join the table without a jump and stay within about 1% of the
/// extended values up to n = 100.
///
/// # Errors
///
/// - [`StatError::InsufficientData`] for n < 4.
/// - [`StatError::InvalidArgument`] for n > 1000.
pub fn lilliefors(data: &[f64], alpha: f64) -> Result<NormalityResult, StatError> {
    check_alpha(alpha)?;
    let test = NormalityTest::Lilliefors;
    let x = prepare(data, 4, Some(1000))?;
    let n = x.len();
    if is_constant(&x) {
        return Ok(NormalityResult::degenerate(test, alpha, n, Degeneracy::ConstantSample));
    }

    let (mean, sd) = mean_sd(&x);
    let d = ks_distance(&x, mean, sd);
    let (c05, c01) = lilliefors_critical_values(n);
    let p = if d > c01 {
        0.01
    } else if d > c05 {
        0.05
    } else {
        0.20
    };
    Ok(NormalityResult::new(test, d, p, alpha, n))
}

// ── D'Agostino K² ─────────────────────────────────────────────────────

/// D'Agostino–Pearson omnibus K² test.
///
/// Combines the D'Agostino skewness transform Z₁ and the Anscombe–Glynn
/// kurtosis transform Z₂; K² = Z₁² + Z₂² is compared against χ²(2).
/// A sample with zero skewness yields a [`Degeneracy::SymmetricSample`]
/// sentinel.
///
/// # Errors
///
/// [`StatError::InsufficientData`] for n < 20.
pub fn dagostino_k2(data: &[f64], alpha: f64) -> Result<NormalityResult, StatError> {
    check_alpha(alpha)?;
    let test = NormalityTest::DAgostinoK2;
    let x = prepare(data, 20, None)?;
    let n = x.len();
    if is_constant(&x) {
        return Ok(NormalityResult::degenerate(test, alpha, n, Degeneracy::ConstantSample));
    }

    let nf = n as f64;
    let (m2, m3, m4) = moments(&x);
    let g1 = m3 / m2.powf(1.5);
    if g1.abs() < 1e-12 {
        return Ok(NormalityResult::degenerate(test, alpha, n, Degeneracy::SymmetricSample));
    }
    let b2 = m4 / (m2 * m2);

    // Skewness
    let y = g1 * ((nf + 1.0) * (nf + 3.0) / (6.0 * (nf - 2.0))).sqrt();
    let beta2 = 3.0 * (nf * nf + 27.0 * nf - 70.0) * (nf + 1.0) * (nf + 3.0)
        / ((nf - 2.0) * (nf + 5.0) * (nf + 7.0) * (nf + 9.0));
    let w2 = -1.0 + (2.0 * (beta2 - 1.0)).sqrt();
    let delta = 1.0 / (0.5 * w2.ln()).sqrt();
    let alpha_s = (2.0 / (w2 - 1.0)).sqrt();
    let ya = y / alpha_s;
    let z1 = delta * (ya + (ya * ya + 1.0).sqrt()).ln();

    // Kurtosis
    let mean_b2 = 3.0 * (nf - 1.0) / (nf + 1.0);
    let var_b2 = 24.0 * nf * (nf - 2.0) * (nf - 3.0)
        / ((nf + 1.0).powi(2) * (nf + 3.0) * (nf + 5.0));
    let xk = (b2 - mean_b2) / var_b2.sqrt();
    let sqrt_beta1 = 6.0 * (nf * nf - 5.0 * nf + 2.0) / ((nf + 7.0) * (nf + 9.0))
        * (6.0 * (nf + 3.0) * (nf + 5.0) / (nf * (nf - 2.0) * (nf - 3.0))).sqrt();
    let a = 6.0
        + 8.0 / sqrt_beta1 * (2.0 / sqrt_beta1 + (1.0 + 4.0 / (sqrt_beta1 * sqrt_beta1)).sqrt());
    let tail = (1.0 - 2.0 / a) / (1.0 + xk * (2.0 / (a - 4.0)).sqrt());
    let z2 = ((1.0 - 2.0 / (9.0 * a)) - tail.cbrt()) / (2.0 / (9.0 * a)).sqrt();

    let k2 = z1 * z1 + z2 * z2;
    let p = upper_tail(chi_square_cdf(k2, 2.0));
    Ok(NormalityResult::new(test, k2, p, alpha, n))
}

// ── Battery ───────────────────────────────────────────────────────────

/// One test slot in a [`NormalityBattery`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryEntry {
    pub test: NormalityTest,
    /// Present when the test ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<NormalityResult>,
    /// Message of the error that prevented the test from running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of running several normality tests on one sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalityBattery {
    pub entries: Vec<BatteryEntry>,
    /// Tests that produced a usable (non-degenerate) result.
    pub usable: usize,
    /// Usable tests that did not reject normality.
    pub normal_count: usize,
    /// `normal_count >= ⌈usable / 2⌉` with at least one usable test.
    pub consensus_normal: bool,
    pub alpha: f64,
}

/// Runs Shapiro–Wilk, Jarque–Bera, Anderson–Darling, Kolmogorov–Smirnov
/// and, for n ≥ 20, D'Agostino K². Errors are captured per test.
///
/// # Errors
///
/// [`StatError::InvalidArgument`] if α ∉ (0, 1).
///
/// ```
/// use u_statlab::normality::normality_battery;
///
/// let data: Vec<f64> = (1..=30).map(|i| ((i * 37) % 30) as f64).collect();
/// let battery = normality_battery(&data, 0.05).unwrap();
/// assert_eq!(battery.entries.len(), 5);
/// ```
pub fn normality_battery(data: &[f64], alpha: f64) -> Result<NormalityBattery, StatError> {
    check_alpha(alpha)?;
    let n = data.iter().filter(|v| v.is_finite()).count();

    type TestFn = fn(&[f64], f64) -> Result<NormalityResult, StatError>;
    let mut tests: Vec<(NormalityTest, TestFn)> = vec![
        (NormalityTest::ShapiroWilk, shapiro_wilk as TestFn),
        (NormalityTest::JarqueBera, jarque_bera as TestFn),
        (NormalityTest::AndersonDarling, anderson_darling as TestFn),
        (NormalityTest::KolmogorovSmirnov, kolmogorov_smirnov as TestFn),
    ];
    if n >= 20 {
        tests.push((NormalityTest::DAgostinoK2, dagostino_k2 as TestFn));
    }

    let entries: Vec<BatteryEntry> = tests
        .into_iter()
        .map(|(test, run)| match run(data, alpha) {
            Ok(result) => BatteryEntry {
                test,
                result: Some(result),
                error: None,
            },
            Err(e) => BatteryEntry {
                test,
                result: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    let usable_results: Vec<&NormalityResult> = entries
        .iter()
        .filter_map(|e| e.result.as_ref())
        .filter(|r| r.is_usable())
        .collect();
    let usable = usable_results.len();
    let normal_count = usable_results.iter().filter(|r| r.is_normal).count();
    let consensus_normal = usable > 0 && normal_count >= usable.div_ceil(2);

    Ok(NormalityBattery {
        entries,
        usable,
        normal_count,
        consensus_normal,
        alpha,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expected normal order statistics, a near-perfect normal sample.
    fn normal_scores(n: usize) -> Vec<f64> {
        (1..=n)
            .map(|i| normal_inverse((i as f64 - 0.5) / n as f64).unwrap())
            .collect()
    }

    /// Exponential(1) quantiles, a strongly right-skewed sample.
    fn exponential_scores(n: usize) -> Vec<f64> {
        (1..=n)
            .map(|i| -(1.0 - (i as f64 - 0.5) / n as f64).ln())
            .collect()
    }

    #[test]
    fn shapiro_wilk_accepts_normal_scores() {
        for n in [5, 8, 11, 12, 30, 200] {
            let r = shapiro_wilk(&normal_scores(n), 0.05).unwrap();
            assert!(r.statistic > 0.9 && r.statistic <= 1.0, "n={n} W={}", r.statistic);
            assert!(r.is_normal, "n={n} p={}", r.p_value);
        }
    }

    #[test]
    fn shapiro_wilk_rejects_skewed() {
        let r = shapiro_wilk(&exponential_scores(60), 0.05).unwrap();
        assert!(r.p_value < 0.01, "p={}", r.p_value);
        assert!(!r.is_normal);
    }

    #[test]
    fn shapiro_wilk_exact_three_point_p_value() {
        // W = 0.964286; p = 6/π·(asin √W − asin √0.75).
        let r = shapiro_wilk(&[1.0, 2.0, 4.0], 0.05).unwrap();
        assert!((r.statistic - 0.964_285_714).abs() < 1e-6);
        assert!((r.p_value - 0.636_887).abs() < 1e-4, "p={}", r.p_value);
    }

    #[test]
    fn shapiro_wilk_coefficients_have_unit_norm() {
        for n in [4, 7, 10, 25] {
            let a = sw_coefficients(n).unwrap();
            let norm: f64 = a.iter().map(|v| v * v).sum();
            assert!((norm - 1.0).abs() < 1e-9, "n={n}");
            assert!((a[0] + a[n - 1]).abs() < 1e-9);
        }
    }

    #[test]
    fn shapiro_wilk_bounds() {
        assert!(matches!(
            shapiro_wilk(&[1.0, 2.0], 0.05),
            Err(StatError::InsufficientData { min_required: 3, actual: 2 })
        ));
        let big: Vec<f64> = (0..5001).map(|i| i as f64).collect();
        assert!(matches!(
            shapiro_wilk(&big, 0.05),
            Err(StatError::InvalidArgument { .. })
        ));
        assert!(shapiro_wilk(&[1.0, 2.0, 3.0], 1.5).is_err());
    }

    #[test]
    fn constant_sample_is_sentinel() {
        let data = [4.0; 25];
        for r in [
            shapiro_wilk(&data, 0.05).unwrap(),
            jarque_bera(&data, 0.05).unwrap(),
            kolmogorov_smirnov(&data, 0.05).unwrap(),
            anderson_darling(&data, 0.05).unwrap(),
            lilliefors(&data, 0.05).unwrap(),
            dagostino_k2(&data, 0.05).unwrap(),
        ] {
            assert!(r.statistic.is_nan());
            assert!(r.p_value.is_nan());
            assert!(!r.is_normal);
            assert_eq!(r.error, Some(Degeneracy::ConstantSample));
        }
    }

    #[test]
    fn jarque_bera_detects_skew() {
        let normal = jarque_bera(&normal_scores(100), 0.05).unwrap();
        assert!(normal.is_normal);
        let skewed = jarque_bera(&exponential_scores(100), 0.05).unwrap();
        assert!(skewed.p_value < 0.001);
        assert!(jarque_bera(&[1.0, 2.0, 3.0], 0.05).is_err());
    }

    #[test]
    fn kolmogorov_series() {
        assert_eq!(kolmogorov_p(0.0), 1.0);
        assert!((kolmogorov_p(1.36) - 0.049).abs() < 2e-3);
        assert!(kolmogorov_p(3.0) < 1e-6);
        let r = kolmogorov_smirnov(&normal_scores(50), 0.05).unwrap();
        assert!(r.statistic < 0.1);
        assert!(r.is_normal);
    }

    #[test]
    fn anderson_darling_regimes() {
        assert_eq!(anderson_darling_p(12.0), 0.0);
        assert!(anderson_darling_p(0.1) > 0.9);
        assert!((anderson_darling_p(0.752) - 0.05).abs() < 5e-3);
        let r = anderson_darling(&exponential_scores(80), 0.05).unwrap();
        assert!(!r.is_normal);
        assert!(anderson_darling(&[1.0; 7], 0.05).is_err());
    }

    #[test]
    fn lilliefors_table_interpolation() {
        assert_eq!(lilliefors_critical_values(10), (0.258, 0.294));
        let (c05, _) = lilliefors_critical_values(22);
        assert!((c05 - (0.190 + 0.4 * (0.173 - 0.190))).abs() < 1e-12);
        let (c05, c01) = lilliefors_critical_values(100);
        assert!((c05 - 0.0886).abs() < 1e-12);
        assert!((c01 - 0.1031).abs() < 1e-12);
    }

    #[test]
    fn lilliefors_asymptote_joins_table() {
        let (t05, t01) = lilliefors_critical_values(30);
        let (a05, a01) = lilliefors_critical_values(31);
        assert!(a05 < t05 && t05 - a05 < 0.005);
        assert!(a01 < t01 && t01 - a01 < 0.005);
        let (c05, _) = lilliefors_critical_values(50);
        assert!((c05 - 0.886 / 50f64.sqrt()).abs() < 1e-12);
        let mut prev = f64::INFINITY;
        for n in 4..=100 {
            let (c05, _) = lilliefors_critical_values(n);
            assert!(c05 <= prev, "n={n}");
            prev = c05;
        }
    }

    #[test]
    fn lilliefors_bands() {
        let r = lilliefors(&normal_scores(40), 0.05).unwrap();
        assert_eq!(r.p_value, 0.20);
        let r = lilliefors(&exponential_scores(200), 0.05).unwrap();
        assert_eq!(r.p_value, 0.01);
        let big: Vec<f64> = (0..1001).map(|i| i as f64).collect();
        assert!(lilliefors(&big, 0.05).is_err());
    }

    #[test]
    fn dagostino_symmetric_sentinel() {
        let data: Vec<f64> = (1..=21).map(|i| i as f64).collect();
        let r = dagostino_k2(&data, 0.05).unwrap();
        assert_eq!(r.error, Some(Degeneracy::SymmetricSample));
    }

    #[test]
    fn dagostino_rejects_skewed() {
        let r = dagostino_k2(&exponential_scores(200), 0.05).unwrap();
        assert!(r.statistic > 10.0);
        assert!(!r.is_normal);
        assert!(dagostino_k2(&[1.0; 10], 0.05).is_err());
    }

    #[test]
    fn battery_small_sample_captures_errors() {
        let battery = normality_battery(&[1.0, 2.0, 4.0, 7.0, 11.0], 0.05).unwrap();
        assert_eq!(battery.entries.len(), 4);
        let ad = battery
            .entries
            .iter()
            .find(|e| e.test == NormalityTest::AndersonDarling)
            .unwrap();
        assert!(ad.result.is_none());
        assert!(ad.error.as_deref().unwrap_or("").contains("at least 8"));
        assert_eq!(battery.usable, 3);
    }

    #[test]
    fn battery_verdicts() {
        let skewed = normality_battery(&exponential_scores(300), 0.05).unwrap();
        assert_eq!(skewed.entries.len(), 5);
        assert!(!skewed.consensus_normal);

        let normal = normality_battery(&normal_scores(301), 0.05).unwrap();
        assert!(normal.consensus_normal);
    }

    #[test]
    fn battery_of_nothing() {
        let battery = normality_battery(&[f64::NAN], 0.05).unwrap();
        assert_eq!(battery.usable, 0);
        assert!(!battery.consensus_normal);
    }
}
