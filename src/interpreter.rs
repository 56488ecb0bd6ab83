//! Plain-language interpretation of test results.
//!
//! [`interpret`] works on typed results wrapped in [`TestResult`];
//! [`interpret_json`] works on serialized result records and recognises the
//! test from the `type` field or, failing that, from the keys present.
//! Both are pure functions.
//!
//! ```
//! use u_statlab::hypothesis::chi_square_from_table;
//! use u_statlab::interpreter::{interpret, Decision, SignificanceBand, TestResult};
//!
//! let chi = chi_square_from_table(&[vec![10.0, 20.0], vec![20.0, 10.0]], 0.05).unwrap();
//! let out = interpret(&TestResult::ChiSquare(chi));
//! assert_eq!(out.decision, Decision::RejectNull);
//! assert_eq!(out.significance, SignificanceBand::Strong);
//! assert!(!out.assumptions.is_empty());
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::analysis::{CorrelationMethod, CorrelationResult, LinearRegression};
use crate::error::StatError;
use crate::hypothesis::{
    AnovaResult, ChiSquareResult, MannWhitneyResult, TTestKind, TTestResult, ZTestResult,
};
use crate::normality::{NormalityResult, NormalityTest};

// ── Types ─────────────────────────────────────────────────────────────

/// A typed result accepted by [`interpret`].
///
/// Serializes with a `type` tag next to the result's own fields, which is
/// the record shape [`interpret_json`] reads back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TestResult {
    TTest(TTestResult),
    ZTest(ZTestResult),
    Anova(AnovaResult),
    ChiSquare(ChiSquareResult),
    MannWhitney(MannWhitneyResult),
    Correlation(CorrelationResult),
    Regression(LinearRegression),
    Normality(NormalityResult),
}

/// Family of the interpreted test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    TTest,
    ZTest,
    Anova,
    ChiSquare,
    MannWhitney,
    Correlation,
    Regression,
    Normality,
    Clustering,
}

/// Outcome for the null hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    RejectNull,
    FailToReject,
    /// No p-value (degenerate input or a descriptive result).
    NotApplicable,
}

/// Strength of evidence against the null hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignificanceBand {
    None,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl SignificanceBand {
    /// Very strong below .001, strong below .01, moderate below .05, weak
    /// below .1. `NaN` is `None`.
    ///
    /// ```
    /// use u_statlab::interpreter::SignificanceBand;
    ///
    /// assert_eq!(SignificanceBand::from_p(0.0005), SignificanceBand::VeryStrong);
    /// assert_eq!(SignificanceBand::from_p(0.03), SignificanceBand::Moderate);
    /// assert_eq!(SignificanceBand::from_p(0.07), SignificanceBand::Weak);
    /// assert_eq!(SignificanceBand::from_p(0.5), SignificanceBand::None);
    /// ```
    pub fn from_p(p: f64) -> Self {
        if p < 0.001 {
            Self::VeryStrong
        } else if p < 0.01 {
            Self::Strong
        } else if p < 0.05 {
            Self::Moderate
        } else if p < 0.1 {
            Self::Weak
        } else {
            Self::None
        }
    }
}

/// Effect-size statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectMeasure {
    CohensD,
    /// Correlation-type r (Pearson, Spearman, rank-biserial).
    R,
    RSquared,
    EtaSquared,
    CramersV,
}

/// Conventional effect-size magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Magnitude {
    Negligible,
    Small,
    Medium,
    Large,
}

impl EffectMeasure {
    /// Cohen's thresholds: d 0.2/0.5/0.8, r and V 0.1/0.3/0.5,
    /// R² 0.02/0.13/0.26, η² 0.01/0.06/0.14.
    pub fn magnitude(self, value: f64) -> Magnitude {
        let (small, medium, large) = match self {
            Self::CohensD => (0.2, 0.5, 0.8),
            Self::R | Self::CramersV => (0.1, 0.3, 0.5),
            Self::RSquared => (0.02, 0.13, 0.26),
            Self::EtaSquared => (0.01, 0.06, 0.14),
        };
        let v = value.abs();
        if v >= large {
            Magnitude::Large
        } else if v >= medium {
            Magnitude::Medium
        } else if v >= small {
            Magnitude::Small
        } else {
            Magnitude::Negligible
        }
    }
}

/// Effect size with its descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectSize {
    pub measure: EffectMeasure,
    pub value: f64,
    pub magnitude: Magnitude,
}

/// How much weight the result can bear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Moderate,
    High,
}

/// Confidence assessment with the reasons behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Confidence {
    pub level: ConfidenceLevel,
    pub reasons: Vec<String>,
}

/// Plain-language reading of one result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interpretation {
    pub test: TestKind,
    pub summary: String,
    pub decision: Decision,
    pub significance: SignificanceBand,
    pub p_value: Option<f64>,
    pub effect_size: Option<EffectSize>,
    pub confidence: Confidence,
    pub assumptions: Vec<String>,
    pub recommendations: Vec<String>,
}

// ── Facts ─────────────────────────────────────────────────────────────

/// Test-independent view of a result.
#[derive(Debug, Clone)]
struct Facts {
    kind: TestKind,
    label: String,
    statistic: Option<(&'static str, f64)>,
    df: Option<f64>,
    p_value: Option<f64>,
    alpha: f64,
    significant: Option<bool>,
    n: Option<usize>,
    effect: Option<(EffectMeasure, f64)>,
    /// Confidence interval and the estimate it brackets.
    interval: Option<([f64; 2], f64)>,
    degenerate: Option<String>,
    warnings: usize,
    t_kind: Option<TTestKind>,
    spearman: bool,
    /// Normality outcome; `true` means consistent with normal.
    is_normal: Option<bool>,
    clusters: Option<usize>,
}

impl Facts {
    fn new(kind: TestKind, label: impl Into<String>, alpha: f64) -> Self {
        Self {
            kind,
            label: label.into(),
            statistic: None,
            df: None,
            p_value: None,
            alpha,
            significant: None,
            n: None,
            effect: None,
            interval: None,
            degenerate: None,
            warnings: 0,
            t_kind: None,
            spearman: false,
            is_normal: None,
            clusters: None,
        }
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

fn t_label(kind: TTestKind) -> &'static str {
    match kind {
        TTestKind::OneSample => "One-sample t-test",
        TTestKind::Welch => "Welch two-sample t-test",
        TTestKind::Pooled => "Pooled two-sample t-test",
        TTestKind::Paired => "Paired t-test",
    }
}

fn facts_from_result(result: &TestResult) -> Facts {
    match result {
        TestResult::TTest(r) => {
            let mut f = Facts::new(TestKind::TTest, t_label(r.kind), r.alpha);
            f.statistic = finite(r.t_statistic).map(|t| ("t", t));
            f.df = Some(r.df);
            f.p_value = finite(r.p_value);
            f.significant = Some(r.significant);
            f.n = Some(r.sizes.iter().sum());
            f.effect = finite(r.cohens_d).map(|d| (EffectMeasure::CohensD, d));
            f.interval = finite(r.confidence_interval[0])
                .map(|_| (r.confidence_interval, r.mean_difference));
            f.degenerate = r.error.map(|e| e.to_string());
            f.t_kind = Some(r.kind);
            f
        }
        TestResult::ZTest(r) => {
            let mut f = Facts::new(TestKind::ZTest, "One-sample z-test", r.alpha);
            f.statistic = finite(r.z_statistic).map(|z| ("z", z));
            f.p_value = finite(r.p_value);
            f.significant = Some(r.significant);
            f.n = Some(r.n);
            f.interval = Some((r.confidence_interval, r.mean));
            f
        }
        TestResult::Anova(r) => {
            let mut f = Facts::new(TestKind::Anova, "One-way ANOVA", r.alpha);
            f.statistic = finite(r.f_statistic).map(|v| ("F", v));
            f.df = Some(r.df_between);
            f.p_value = finite(r.p_value);
            f.significant = Some(r.significant);
            f.n = Some(r.group_sizes.iter().sum());
            f.effect = finite(r.eta_squared).map(|e| (EffectMeasure::EtaSquared, e));
            f.degenerate = r.error.map(|e| e.to_string());
            f
        }
        TestResult::ChiSquare(r) => {
            let mut f = Facts::new(TestKind::ChiSquare, "Chi-square test of independence", r.alpha);
            f.statistic = finite(r.statistic).map(|v| ("χ²", v));
            f.df = Some(r.df);
            f.p_value = finite(r.p_value);
            f.significant = Some(r.significant);
            f.n = Some(r.n as usize);
            f.effect = finite(r.cramers_v).map(|v| (EffectMeasure::CramersV, v));
            f.warnings = r.warnings.len();
            f
        }
        TestResult::MannWhitney(r) => {
            let mut f = Facts::new(TestKind::MannWhitney, "Mann-Whitney U test", r.alpha);
            f.statistic = finite(r.u_statistic).map(|u| ("U", u));
            f.p_value = finite(r.p_value);
            f.significant = Some(r.significant);
            f.n = Some(r.n1 + r.n2);
            f.effect = finite(r.effect_size).map(|e| (EffectMeasure::R, e));
            f
        }
        TestResult::Correlation(r) => {
            let spearman = r.method == CorrelationMethod::Spearman;
            let label = if spearman {
                "Spearman rank correlation"
            } else {
                "Pearson correlation"
            };
            let mut f = Facts::new(TestKind::Correlation, label, r.alpha);
            f.statistic = finite(r.correlation).map(|v| ("r", v));
            f.df = Some(r.df);
            f.p_value = finite(r.p_value);
            f.significant = Some(r.significant);
            f.n = Some(r.n);
            f.effect = finite(r.correlation).map(|v| (EffectMeasure::R, v));
            f.degenerate = r.error.map(|e| e.to_string());
            f.spearman = spearman;
            f
        }
        TestResult::Regression(r) => {
            let mut f = Facts::new(TestKind::Regression, "Simple linear regression", r.alpha);
            f.statistic = finite(r.t_statistic).map(|t| ("t", t));
            f.df = Some(r.df);
            f.p_value = finite(r.p_value);
            f.significant = Some(r.significant);
            f.n = Some(r.n);
            f.effect = finite(r.r_squared).map(|v| (EffectMeasure::RSquared, v));
            f.degenerate = r.error.map(|e| e.to_string());
            f
        }
        TestResult::Normality(r) => {
            let mut f = Facts::new(TestKind::Normality, format!("{} test", r.test.name()), r.alpha);
            f.statistic = finite(r.statistic).map(|v| ("statistic", v));
            f.p_value = finite(r.p_value);
            f.n = Some(r.n);
            f.degenerate = r.error.map(|e| e.to_string());
            f.is_normal = r.error.is_none().then_some(r.is_normal);
            if r.test == NormalityTest::KolmogorovSmirnov {
                f.label.push_str(" (parameters estimated)");
            }
            f
        }
    }
}

// ── JSON Records ──────────────────────────────────────────────────────

fn num(v: &Value, key: &str) -> Option<f64> {
    v.get(key).and_then(Value::as_f64).and_then(finite)
}

fn count(v: &Value, key: &str) -> Option<usize> {
    match v.get(key)? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_f64)
                .map(|x| x.max(0.0) as usize)
                .sum(),
        ),
        other => other.as_f64().map(|x| x.max(0.0) as usize),
    }
}

fn interval(v: &Value, key: &str) -> Option<[f64; 2]> {
    let arr = v.get(key)?.as_array()?;
    match arr.as_slice() {
        [lo, hi] => Some([lo.as_f64().and_then(finite)?, hi.as_f64().and_then(finite)?]),
        _ => None,
    }
}

fn kind_from_tag(tag: &str) -> Option<TestKind> {
    let key: String = tag
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    Some(match key.as_str() {
        "ttest" | "onesamplettest" | "twosamplettest" | "pairedttest" | "welchttest" => {
            TestKind::TTest
        }
        "ztest" => TestKind::ZTest,
        "anova" | "onewayanova" => TestKind::Anova,
        "chisquare" | "chisquared" | "chisquareindependence" => TestKind::ChiSquare,
        "mannwhitney" | "mannwhitneyu" => TestKind::MannWhitney,
        "correlation" | "pearson" | "spearman" => TestKind::Correlation,
        "regression" | "linearregression" => TestKind::Regression,
        "normality" | "shapirowilk" | "jarquebera" | "kolmogorovsmirnov" | "andersondarling"
        | "lilliefors" | "dagostinok2" => TestKind::Normality,
        "clustering" | "kmeans" | "cluster" => TestKind::Clustering,
        _ => return None,
    })
}

fn kind_from_keys(v: &Value) -> Option<TestKind> {
    let has = |k: &str| v.get(k).is_some();
    if has("correlation") {
        Some(TestKind::Correlation)
    } else if has("rSquared") {
        Some(TestKind::Regression)
    } else if has("fStatistic") {
        Some(TestKind::Anova)
    } else if has("tStatistic") {
        Some(TestKind::TTest)
    } else if has("statistic") && has("df") {
        Some(TestKind::ChiSquare)
    } else if has("isNormal") {
        Some(TestKind::Normality)
    } else if has("clusters") {
        Some(TestKind::Clustering)
    } else if has("uStatistic") {
        Some(TestKind::MannWhitney)
    } else if has("zStatistic") {
        Some(TestKind::ZTest)
    } else {
        None
    }
}

fn facts_from_json(v: &Value) -> Result<Facts, StatError> {
    if !v.is_object() {
        return Err(StatError::InvalidJson("result record must be an object".into()));
    }
    let kind = v
        .get("type")
        .and_then(Value::as_str)
        .and_then(kind_from_tag)
        .or_else(|| kind_from_keys(v))
        .ok_or_else(|| StatError::InvalidJson("unrecognised result record".into()))?;

    let alpha = num(v, "alpha").unwrap_or(crate::DEFAULT_ALPHA);
    let label = match kind {
        TestKind::TTest => match v.get("kind").and_then(Value::as_str) {
            Some("one_sample") => t_label(TTestKind::OneSample),
            Some("welch") => t_label(TTestKind::Welch),
            Some("pooled") => t_label(TTestKind::Pooled),
            Some("paired") => t_label(TTestKind::Paired),
            _ => "t-test",
        },
        TestKind::ZTest => "z-test",
        TestKind::Anova => "One-way ANOVA",
        TestKind::ChiSquare => "Chi-square test",
        TestKind::MannWhitney => "Mann-Whitney U test",
        TestKind::Correlation => "Correlation",
        TestKind::Regression => "Linear regression",
        TestKind::Normality => "Normality test",
        TestKind::Clustering => "Clustering",
    };
    let mut f = Facts::new(kind, label, alpha);
    f.p_value = num(v, "pValue");
    f.significant = v.get("significant").and_then(Value::as_bool);
    f.df = num(v, "df").or_else(|| num(v, "dfBetween"));
    f.n = count(v, "n")
        .or_else(|| count(v, "sizes"))
        .or_else(|| count(v, "groupSizes"))
        .or_else(|| Some(count(v, "n1")? + count(v, "n2")?));
    f.degenerate = v.get("error").and_then(|e| match e {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    });
    f.warnings = v.get("warnings").and_then(Value::as_array).map_or(0, Vec::len);

    match kind {
        TestKind::TTest => {
            f.statistic = num(v, "tStatistic").map(|t| ("t", t));
            f.effect = num(v, "cohensD").map(|d| (EffectMeasure::CohensD, d));
            f.interval = interval(v, "confidenceInterval").zip(num(v, "meanDifference"));
        }
        TestKind::ZTest => {
            f.statistic = num(v, "zStatistic").map(|z| ("z", z));
            f.interval = interval(v, "confidenceInterval").zip(num(v, "mean"));
        }
        TestKind::Anova => {
            f.statistic = num(v, "fStatistic").map(|x| ("F", x));
            f.effect = num(v, "etaSquared").map(|e| (EffectMeasure::EtaSquared, e));
        }
        TestKind::ChiSquare => {
            f.statistic = num(v, "statistic").map(|x| ("χ²", x));
            f.effect = num(v, "cramersV").map(|e| (EffectMeasure::CramersV, e));
        }
        TestKind::MannWhitney => {
            f.statistic = num(v, "uStatistic").map(|u| ("U", u));
            f.effect = num(v, "effectSize").map(|e| (EffectMeasure::R, e));
        }
        TestKind::Correlation => {
            f.statistic = num(v, "correlation").map(|r| ("r", r));
            f.effect = num(v, "correlation").map(|r| (EffectMeasure::R, r));
            f.spearman = v.get("method").and_then(Value::as_str) == Some("spearman");
        }
        TestKind::Regression => {
            f.statistic = num(v, "tStatistic").map(|t| ("t", t));
            f.effect = num(v, "rSquared").map(|r| (EffectMeasure::RSquared, r));
        }
        TestKind::Normality => {
            f.statistic = num(v, "statistic").map(|s| ("statistic", s));
            f.is_normal = v
                .get("isNormal")
                .and_then(Value::as_bool)
                .or_else(|| f.p_value.map(|p| p > alpha));
        }
        TestKind::Clustering => {
            f.clusters = match v.get("clusters") {
                Some(Value::Array(items)) => Some(items.len()),
                Some(other) => other.as_u64().map(|k| k as usize),
                None => None,
            };
        }
    }
    Ok(f)
}

// ── Interpretation ────────────────────────────────────────────────────

fn format_p(p: f64) -> String {
    if p < 0.001 {
        "p < 0.001".to_string()
    } else {
        format!("p = {p:.4}")
    }
}

fn conclusion(f: &Facts, decision: Decision) -> &'static str {
    let reject = decision == Decision::RejectNull;
    match f.kind {
        TestKind::TTest | TestKind::ZTest if reject => {
            "The mean difference is statistically significant."
        }
        TestKind::TTest | TestKind::ZTest => "No statistically significant difference was found.",
        TestKind::Anova if reject => "At least one group mean differs from the others.",
        TestKind::Anova => "No significant difference between the group means.",
        TestKind::ChiSquare if reject => "The variables are associated.",
        TestKind::ChiSquare => "No significant association between the variables.",
        TestKind::MannWhitney if reject => "The two distributions differ.",
        TestKind::MannWhitney => "No significant difference between the two distributions.",
        TestKind::Correlation if reject => "The correlation is statistically significant.",
        TestKind::Correlation => "The correlation is not statistically significant.",
        TestKind::Regression if reject => "The slope is significantly different from zero.",
        TestKind::Regression => "The slope is not significantly different from zero.",
        TestKind::Normality if reject => "The data deviate from a normal distribution.",
        TestKind::Normality => "The data are consistent with a normal distribution.",
        TestKind::Clustering => "",
    }
}

fn decide(f: &Facts) -> Decision {
    if f.degenerate.is_some() {
        return Decision::NotApplicable;
    }
    if f.kind == TestKind::Normality {
        return match f.is_normal {
            Some(true) => Decision::FailToReject,
            Some(false) => Decision::RejectNull,
            None => Decision::NotApplicable,
        };
    }
    match (f.significant, f.p_value) {
        (Some(true), _) => Decision::RejectNull,
        (Some(false), Some(_)) => Decision::FailToReject,
        (None, Some(p)) if p < f.alpha => Decision::RejectNull,
        (None, Some(_)) => Decision::FailToReject,
        (_, None) => Decision::NotApplicable,
    }
}

fn summarize(f: &Facts, decision: Decision) -> String {
    if let Some(reason) = &f.degenerate {
        return format!("{}: the statistic is undefined ({reason}).", f.label);
    }
    if f.kind == TestKind::Clustering {
        return match f.clusters {
            Some(k) => format!("Clustering found {k} clusters."),
            None => "Clustering result without a cluster count.".to_string(),
        };
    }
    let mut s = f.label.clone();
    if let Some((name, value)) = f.statistic {
        s.push_str(": ");
        s.push_str(name);
        if let Some(df) = f.df.filter(|d| d.is_finite()) {
            if df.fract() == 0.0 {
                s.push_str(&format!("({df})"));
            } else {
                s.push_str(&format!("({df:.2})"));
            }
        }
        s.push_str(&format!(" = {value:.3}"));
        if let Some(p) = f.p_value {
            s.push_str(&format!(", {}", format_p(p)));
        }
    }
    s.push_str(". ");
    s.push_str(conclusion(f, decision));
    s
}

fn assess_confidence(f: &Facts) -> Confidence {
    let mut score = 0i32;
    let mut reasons = Vec::new();

    if f.degenerate.is_some() {
        return Confidence {
            level: ConfidenceLevel::Low,
            reasons: vec!["The statistic could not be computed".into()],
        };
    }

    match f.n {
        Some(n) if n >= 100 => {
            score += 2;
            reasons.push(format!("Large sample (n = {n})"));
        }
        Some(n) if n >= 30 => {
            score += 1;
            reasons.push(format!("Adequate sample (n = {n})"));
        }
        Some(n) if n < 10 => {
            score -= 1;
            reasons.push(format!("Very small sample (n = {n})"));
        }
        Some(n) => reasons.push(format!("Small sample (n = {n})")),
        None => {}
    }

    if let Some(p) = f.p_value {
        if p >= f.alpha / 2.0 && p <= f.alpha * 2.0 {
            score -= 1;
            reasons.push(format!("p-value is close to α = {}", f.alpha));
        } else {
            score += 1;
            reasons.push("p-value is far from the significance threshold".into());
        }
    }

    if let Some(([lo, hi], estimate)) = f.interval {
        if estimate != 0.0 {
            let relative = (hi - lo) / estimate.abs();
            if relative < 0.5 {
                score += 1;
                reasons.push("Narrow confidence interval".into());
            } else if relative > 2.0 {
                score -= 1;
                reasons.push("Wide confidence interval".into());
            }
        }
    }

    if f.warnings > 0 {
        score -= 1;
        reasons.push("The test reported warnings".into());
    }

    let level = if score >= 2 {
        ConfidenceLevel::High
    } else if score >= 0 {
        ConfidenceLevel::Moderate
    } else {
        ConfidenceLevel::Low
    };
    Confidence { level, reasons }
}

fn assumptions(f: &Facts) -> Vec<String> {
    let list: &[&str] = match f.kind {
        TestKind::TTest => match f.t_kind {
            Some(TTestKind::Paired) => &[
                "Pairs are independent of each other",
                "Differences are approximately normally distributed",
            ],
            Some(TTestKind::Pooled) => &[
                "Observations are independent",
                "Each group is approximately normally distributed",
                "Groups have equal variances",
            ],
            Some(TTestKind::Welch) => &[
                "Observations are independent",
                "Each group is approximately normally distributed",
                "Variances may differ between groups",
            ],
            _ => &[
                "Observations are independent",
                "Data are approximately normally distributed or n is large",
            ],
        },
        TestKind::ZTest => &[
            "Observations are independent",
            "The population standard deviation is known",
            "Data are normally distributed or n is large",
        ],
        TestKind::Anova => &[
            "Observations are independent",
            "Each group is approximately normally distributed",
            "Groups have equal variances",
        ],
        TestKind::ChiSquare => &[
            "Observations are independent",
            "Each observation falls in exactly one cell",
            "Expected counts are at least 5 in every cell",
        ],
        TestKind::MannWhitney => &[
            "Observations are independent",
            "The variable is at least ordinal",
            "Distributions have similar shapes when comparing medians",
        ],
        TestKind::Correlation if f.spearman => &[
            "Observations are independent pairs",
            "The relationship is monotonic",
        ],
        TestKind::Correlation => &[
            "Observations are independent pairs",
            "The relationship is linear",
            "Both variables are approximately normally distributed",
            "No influential outliers",
        ],
        TestKind::Regression => &[
            "The relationship is linear",
            "Residuals are independent",
            "Residuals have constant variance",
            "Residuals are approximately normally distributed",
        ],
        TestKind::Normality => &["Observations are independent and identically distributed"],
        TestKind::Clustering => &[
            "Features are on comparable scales",
            "The chosen number of clusters suits the data",
        ],
    };
    list.iter().map(|s| s.to_string()).collect()
}

fn recommend(f: &Facts, decision: Decision, effect: Option<&EffectSize>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    if f.degenerate.is_some() {
        out.push("Check the input for constant or near-constant values.".into());
        return out;
    }

    let small_n = f.n.is_some_and(|n| n < 30);
    match decision {
        Decision::RejectNull if effect.is_some_and(|e| e.magnitude <= Magnitude::Small) => {
            out.push(
                "The result is significant but the effect is small; judge its practical relevance."
                    .into(),
            )
        }
        Decision::FailToReject if small_n && f.kind != TestKind::Normality => {
            out.push("The sample is small; the test may lack power to detect an effect.".into())
        }
        _ => {}
    }

    match f.kind {
        TestKind::TTest if small_n => out.push(
            "Check normality, or use the Mann-Whitney U test if the data are skewed.".into(),
        ),
        TestKind::Anova if decision == Decision::RejectNull => out.push(
            "Run post-hoc pairwise comparisons to find which groups differ.".into(),
        ),
        TestKind::ChiSquare if f.warnings > 0 => out.push(
            "Merge sparse categories or use an exact test.".into(),
        ),
        TestKind::Correlation => {
            out.push("Correlation does not imply causation.".into());
            if effect.is_some_and(|e| e.magnitude >= Magnitude::Medium) {
                out.push("Fit a regression model to quantify the relationship.".into());
            }
        }
        TestKind::Regression => {
            out.push("Inspect residual plots to check the model assumptions.".into())
        }
        TestKind::Normality if decision == Decision::RejectNull => out.push(
            "Use nonparametric methods or transform the data before parametric tests.".into(),
        ),
        TestKind::Normality if f.n.is_some_and(|n| n > 5000) => out.push(
            "With very large samples trivial departures become significant; check a Q-Q plot."
                .into(),
        ),
        _ => {}
    }
    out
}

fn build(f: Facts) -> Interpretation {
    let decision = decide(&f);
    let effect_size = f.effect.map(|(measure, value)| EffectSize {
        measure,
        value,
        magnitude: measure.magnitude(value),
    });
    Interpretation {
        test: f.kind,
        summary: summarize(&f, decision),
        decision,
        significance: f.p_value.map_or(SignificanceBand::None, SignificanceBand::from_p),
        p_value: f.p_value,
        confidence: assess_confidence(&f),
        assumptions: assumptions(&f),
        recommendations: recommend(&f, decision, effect_size.as_ref()),
        effect_size,
    }
}

/// Interprets a typed result.
pub fn interpret(result: &TestResult) -> Interpretation {
    build(facts_from_result(result))
}

/// Interprets a serialized result record.
///
/// The test is taken from the `type` field when present, otherwise from
/// the first key found among `correlation`, `rSquared`, `fStatistic`,
/// `tStatistic`, `statistic` with `df`, `isNormal`, `clusters`,
/// `uStatistic` and `zStatistic`.
///
/// # Errors
///
/// [`StatError::InvalidJson`] when `value` is not an object or matches no
/// known result shape.
///
/// ```
/// use serde_json::json;
/// use u_statlab::interpreter::{interpret_json, EffectMeasure, Magnitude, TestKind};
///
/// let out = interpret_json(&json!({"correlation": 0.62, "pValue": 0.001, "n": 40})).unwrap();
/// assert_eq!(out.test, TestKind::Correlation);
/// let effect = out.effect_size.unwrap();
/// assert_eq!(effect.measure, EffectMeasure::R);
/// assert_eq!(effect.magnitude, Magnitude::Large);
/// ```
pub fn interpret_json(value: &Value) -> Result<Interpretation, StatError> {
    Ok(build(facts_from_json(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{linear_regression, pearson};
    use crate::hypothesis::{mann_whitney_u, one_sample_t_test, one_way_anova, z_test};
    use crate::normality::shapiro_wilk;
    use serde_json::json;

    #[test]
    fn t_test_interpretation() {
        let r = one_sample_t_test(&[5.0, 5.0, 6.0, 6.0, 7.0, 7.0], 5.0, 0.05).unwrap();
        let out = interpret(&TestResult::TTest(r));
        assert_eq!(out.test, TestKind::TTest);
        assert_eq!(out.decision, Decision::RejectNull);
        assert_eq!(out.significance, SignificanceBand::Moderate);
        assert!(out.summary.starts_with("One-sample t-test: t(5) = 2.739"));
        assert_eq!(out.effect_size.unwrap().measure, EffectMeasure::CohensD);
        // n = 6 and p close to α.
        assert_eq!(out.confidence.level, ConfidenceLevel::Low);
        assert!(out.recommendations.iter().any(|r| r.contains("Mann-Whitney")));
    }

    #[test]
    fn degenerate_result() {
        let r = one_sample_t_test(&[3.0, 3.0, 3.0], 1.0, 0.05).unwrap();
        let out = interpret(&TestResult::TTest(r));
        assert_eq!(out.decision, Decision::NotApplicable);
        assert_eq!(out.significance, SignificanceBand::None);
        assert!(out.p_value.is_none());
        assert!(out.summary.contains("undefined"));
        assert_eq!(out.confidence.level, ConfidenceLevel::Low);
    }

    #[test]
    fn anova_effect_and_post_hoc() {
        let groups: [&[f64]; 3] = [&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]];
        let r = one_way_anova(&groups, 0.05).unwrap();
        let out = interpret(&TestResult::Anova(r));
        let effect = out.effect_size.unwrap();
        assert_eq!(effect.measure, EffectMeasure::EtaSquared);
        assert_eq!(effect.magnitude, Magnitude::Large);
        assert!(out.recommendations.iter().any(|r| r.contains("post-hoc")));
    }

    #[test]
    fn normality_decision_follows_is_normal() {
        let data: Vec<f64> = (1..=30).map(|i| f64::from(i).powi(3)).collect();
        let r = shapiro_wilk(&data, 0.05).unwrap();
        let out = interpret(&TestResult::Normality(r));
        assert_eq!(out.decision, Decision::RejectNull);
        assert!(out.summary.contains("deviate"));
        assert!(out.effect_size.is_none());
    }

    #[test]
    fn mann_whitney_and_z() {
        let r = mann_whitney_u(&[1.0, 3.0, 5.0, 7.0], &[2.0, 4.0, 6.0, 8.0], 0.05).unwrap();
        let out = interpret(&TestResult::MannWhitney(r));
        assert_eq!(out.decision, Decision::FailToReject);
        assert!(out.recommendations.iter().any(|r| r.contains("power")));

        let r = z_test(&[102.0, 98.0, 105.0, 101.0], 100.0, 2.0, 0.05).unwrap();
        assert_eq!(interpret(&TestResult::ZTest(r)).test, TestKind::ZTest);
    }

    #[test]
    fn typed_and_json_agree() {
        let x: Vec<f64> = (0..40).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v + (v * 1.7).sin()).collect();
        let fit = linear_regression(&x, &y, 0.05).unwrap();
        let typed = interpret(&TestResult::Regression(fit.clone()));
        let json = serde_json::to_value(TestResult::Regression(fit)).unwrap();
        assert_eq!(json["type"], "regression");
        let from_json = interpret_json(&json).unwrap();
        assert_eq!(typed.test, from_json.test);
        assert_eq!(typed.decision, from_json.decision);
        assert_eq!(typed.effect_size, from_json.effect_size);

        let r = pearson(&x, &y, 0.05).unwrap();
        let typed = interpret(&TestResult::Correlation(r.clone()));
        let from_json = interpret_json(&serde_json::to_value(&r).unwrap()).unwrap();
        assert_eq!(from_json.test, TestKind::Correlation);
        assert_eq!(typed.significance, from_json.significance);
    }

    #[test]
    fn key_sniffing_order() {
        let kind = |v: Value| interpret_json(&v).unwrap().test;
        assert_eq!(kind(json!({"rSquared": 0.4, "tStatistic": 2.0})), TestKind::Regression);
        assert_eq!(kind(json!({"fStatistic": 4.0, "pValue": 0.02})), TestKind::Anova);
        assert_eq!(kind(json!({"tStatistic": 2.0, "pValue": 0.06})), TestKind::TTest);
        assert_eq!(kind(json!({"statistic": 3.9, "df": 1, "pValue": 0.048})), TestKind::ChiSquare);
        assert_eq!(kind(json!({"statistic": 0.97, "isNormal": true})), TestKind::Normality);
        assert_eq!(kind(json!({"clusters": [[1], [2], [3]]})), TestKind::Clustering);
        assert_eq!(kind(json!({"type": "Mann-Whitney", "pValue": 0.2})), TestKind::MannWhitney);
        assert!(interpret_json(&json!({"foo": 1})).is_err());
        assert!(interpret_json(&json!([1, 2])).is_err());
    }

    #[test]
    fn json_records_without_flags() {
        let record = json!({"tStatistic": 2.5, "pValue": 0.0004, "alpha": 0.01});
        let out = interpret_json(&record).unwrap();
        assert_eq!(out.decision, Decision::RejectNull);
        assert_eq!(out.significance, SignificanceBand::VeryStrong);

        let out = interpret_json(&json!({"clusters": 4})).unwrap();
        assert_eq!(out.decision, Decision::NotApplicable);
        assert_eq!(out.summary, "Clustering found 4 clusters.");

        let record = json!({"statistic": 12.0, "df": 2, "pValue": 0.002, "warnings": ["low"]});
        let out = interpret_json(&record).unwrap();
        assert!(out.recommendations.iter().any(|r| r.contains("sparse")));
    }

    #[test]
    fn magnitudes() {
        assert_eq!(EffectMeasure::CohensD.magnitude(-0.9), Magnitude::Large);
        assert_eq!(EffectMeasure::CohensD.magnitude(0.3), Magnitude::Small);
        assert_eq!(EffectMeasure::RSquared.magnitude(0.15), Magnitude::Medium);
        assert_eq!(EffectMeasure::EtaSquared.magnitude(0.005), Magnitude::Negligible);
        assert_eq!(EffectMeasure::CramersV.magnitude(0.35), Magnitude::Medium);
    }
}
