//! Automatic end-to-end analysis of a dataset.
//!
//! [`auto_analyze`] runs a fixed sequence of stages:
//!
//! 1. validate the dataset (the only stage that can abort),
//! 2. classify every column,
//! 3. describe quantitative and categorical columns,
//! 4. correlate quantitative columns,
//! 5. regress the strongest correlated pairs,
//! 6. characterise distributions,
//! 7. detect outliers,
//! 8. summarise datetime columns,
//! 9. collect insights,
//! 10. suggest visualizations.
//!
//! A failure on one column is recorded in that column's entry and the
//! stage continues. A stage that fails as a whole is listed in
//! [`AnalysisReport::stage_errors`] and the stages depending on it are
//! skipped.
//!
//! ```
//! use u_statlab::auto_analysis::{auto_analyze, AnalysisConfig};
//! use u_statlab::dataset::Dataset;
//!
//! let ds = Dataset::from_json(r#"{"headers":["x","y","g"],"data":[
//!     {"x":1,"y":2.1,"g":"a"},{"x":2,"y":3.9,"g":"b"},{"x":3,"y":6.2,"g":"a"},
//!     {"x":4,"y":7.8,"g":"b"},{"x":5,"y":10.1,"g":"a"},{"x":6,"y":12.2,"g":"b"}]}"#).unwrap();
//! let report = auto_analyze(&ds, &AnalysisConfig::default()).unwrap();
//!
//! assert_eq!(report.summary.type_counts.quantitative, 2);
//! assert_eq!(report.correlation.as_ref().unwrap().strong.len(), 1);
//! assert_eq!(report.regressions.len(), 1);
//! assert!(!report.insights.is_empty());
//! ```

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::analysis::{
    correlation_matrix, linear_regression, CorrelationMatrix, CorrelationMethod, CorrelationPair,
    LinearRegression,
};
use crate::classifier::{cell_date, classify_dataset, VariableClassification, VariableType};
use crate::dataset::{Cell, Dataset};
use crate::descriptive::{describe, kurtosis, skewness, NumericSummary};
use crate::error::StatError;
use crate::normality::{shapiro_wilk, NormalityResult};
use crate::outliers::{detect_outliers, OutlierMethod, OutlierResult};
use crate::tables::{frequency_table, FrequencyEntry};
use crate::validation::{check_alpha, validate_dataset};

/// Distribution stage runs on columns with more than this many values.
const MIN_DISTRIBUTION_N: usize = 10;
/// Outlier stage runs on columns with more than this many values.
const MIN_OUTLIER_N: usize = 5;
/// Categories listed in a categorical summary.
const TOP_CATEGORIES: usize = 10;
/// |r| above which a correlation insight is high priority.
const HIGH_CORRELATION: f64 = 0.7;
/// R² above which a significant regression is highlighted.
const NOTABLE_R_SQUARED: f64 = 0.5;

// ── Configuration ─────────────────────────────────────────────────────

/// Options of [`auto_analyze`].
///
/// Deserializes from camelCase JSON with every field optional:
///
/// ```
/// use u_statlab::auto_analysis::AnalysisConfig;
///
/// let config = AnalysisConfig::from_json(r#"{"minCorrelationThreshold": 0.5}"#).unwrap();
/// assert_eq!(config.min_correlation_threshold, 0.5);
/// assert_eq!(config.significance_level, 0.05);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Floor of |r| for the strong-correlation list. Default: 0.3.
    pub min_correlation_threshold: f64,
    /// α used by every test. Default: 0.05.
    pub significance_level: f64,
    /// Include visualization suggestions. Default: true.
    pub generate_visualizations: bool,
    /// Run the regression and distribution stages. Default: true.
    pub include_advanced_analysis: bool,
    /// |r| a strong pair needs before it is regressed. Default: 0.5.
    pub regression_threshold: f64,
    /// Maximum number of regressions. Default: 5.
    pub max_regressions: usize,
    /// Maximum number of scatter suggestions. Default: 3.
    pub max_scatter_suggestions: usize,
    /// Categorical columns with more categories get no bar chart. Default: 20.
    pub max_bar_categories: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_correlation_threshold: 0.3,
            significance_level: crate::DEFAULT_ALPHA,
            generate_visualizations: true,
            include_advanced_analysis: true,
            regression_threshold: 0.5,
            max_regressions: 5,
            max_scatter_suggestions: 3,
            max_bar_categories: 20,
        }
    }
}

impl AnalysisConfig {
    /// Decodes options from JSON; absent fields keep their defaults.
    pub fn from_json(input: &str) -> Result<Self, StatError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Sets the strong-correlation floor.
    pub fn min_correlation_threshold(mut self, t: f64) -> Self {
        self.min_correlation_threshold = t;
        self
    }

    /// Sets α.
    pub fn significance_level(mut self, alpha: f64) -> Self {
        self.significance_level = alpha;
        self
    }

    /// Enables or disables visualization suggestions.
    pub fn generate_visualizations(mut self, on: bool) -> Self {
        self.generate_visualizations = on;
        self
    }

    /// Enables or disables the regression and distribution stages.
    pub fn include_advanced_analysis(mut self, on: bool) -> Self {
        self.include_advanced_analysis = on;
        self
    }

    fn validate(&self) -> Result<(), StatError> {
        check_alpha(self.significance_level)?;
        for (name, t) in [
            ("minCorrelationThreshold", self.min_correlation_threshold),
            ("regressionThreshold", self.regression_threshold),
        ] {
            if !(0.0..=1.0).contains(&t) {
                return Err(StatError::invalid(name, format!("{t} is not in [0, 1]")));
            }
        }
        Ok(())
    }
}

// ── Report Types ──────────────────────────────────────────────────────

/// Per-column outcome of a stage: a result or the reason it is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnEntry<T> {
    pub column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ColumnEntry<T> {
    fn from_result(stage: &str, column: &str, result: Result<T, StatError>) -> Self {
        match result {
            Ok(r) => Self {
                column: column.to_string(),
                result: Some(r),
                error: None,
            },
            Err(e) => {
                tracing::warn!(stage, column, error = %e, "column failed");
                Self {
                    column: column.to_string(),
                    result: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Counts of columns by variable type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    pub quantitative: usize,
    pub qualitative: usize,
    pub binary: usize,
    pub ordinal: usize,
    pub datetime: usize,
    pub empty: usize,
}

impl TypeCounts {
    fn tally(classifications: &[VariableClassification]) -> Self {
        let mut counts = Self::default();
        for c in classifications {
            match c.variable_type {
                VariableType::Quantitative => counts.quantitative += 1,
                VariableType::Qualitative => counts.qualitative += 1,
                VariableType::Binary => counts.binary += 1,
                VariableType::Ordinal => counts.ordinal += 1,
                VariableType::Datetime => counts.datetime += 1,
                VariableType::Empty => counts.empty += 1,
            }
        }
        counts
    }
}

/// Dataset-level facts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub row_count: usize,
    pub column_count: usize,
    pub type_counts: TypeCounts,
    /// Validation warnings (row key mismatches).
    pub warnings: Vec<String>,
}

/// Frequency summary of a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoricalSummary {
    pub count: usize,
    pub distinct: usize,
    /// Up to ten most frequent categories.
    pub top: Vec<FrequencyEntry>,
    pub mode: Option<String>,
    /// Percentage held by the most frequent category.
    pub concentration: f64,
}

/// Descriptive stage output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptiveStage {
    pub quantitative: Vec<ColumnEntry<NumericSummary>>,
    pub categorical: Vec<ColumnEntry<CategoricalSummary>>,
}

/// Correlation stage output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationStage {
    pub matrix: CorrelationMatrix,
    /// Pairs with |r| at or above the configured floor, strongest first.
    pub strong: Vec<CorrelationPair>,
}

/// Regression of one strongly correlated pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionEntry {
    /// Predictor column.
    pub x: String,
    /// Response column.
    pub y: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<LinearRegression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Shape class of a quantitative column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionClass {
    Normal,
    ApproximatelyNormal,
    SkewRight,
    SkewLeft,
    Leptokurtic,
    Platykurtic,
}

impl DistributionClass {
    /// Normal per Shapiro–Wilk, else by the shape moments: |skew| > 0.5
    /// decides the skew direction, then |excess kurtosis| > 1 the tails.
    pub fn classify(is_normal: bool, skewness: Option<f64>, kurtosis: Option<f64>) -> Self {
        if is_normal {
            return Self::Normal;
        }
        let skew = skewness.unwrap_or(0.0);
        let kurt = kurtosis.unwrap_or(0.0);
        if skew > 0.5 {
            Self::SkewRight
        } else if skew < -0.5 {
            Self::SkewLeft
        } else if kurt > 1.0 {
            Self::Leptokurtic
        } else if kurt < -1.0 {
            Self::Platykurtic
        } else {
            Self::ApproximatelyNormal
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::ApproximatelyNormal => "approximately normal",
            Self::SkewRight => "right-skewed",
            Self::SkewLeft => "left-skewed",
            Self::Leptokurtic => "heavy-tailed",
            Self::Platykurtic => "light-tailed",
        }
    }
}

/// Distribution stage output for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSummary {
    pub shapiro_wilk: NormalityResult,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
    pub class: DistributionClass,
}

/// Urgency of an outlier finding or an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Outlier stage output for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlierSummary {
    pub detection: OutlierResult,
    /// High above 10% flagged, medium above 5%, else low.
    pub severity: Priority,
}

fn outlier_severity(percentage: f64) -> Priority {
    if percentage > 10.0 {
        Priority::High
    } else if percentage > 5.0 {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// Sampling cadence inferred from the mean gap between dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalFrequency {
    Daily,
    Weekly,
    Monthly,
    Annual,
}

impl TemporalFrequency {
    /// Daily up to 1.5 days, weekly up to 10, monthly up to 45, else annual.
    pub fn from_mean_interval(days: f64) -> Self {
        if days <= 1.5 {
            Self::Daily
        } else if days <= 10.0 {
            Self::Weekly
        } else if days <= 45.0 {
            Self::Monthly
        } else {
            Self::Annual
        }
    }
}

/// Temporal stage output for one datetime column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalSummary {
    /// Parsed dates.
    pub count: usize,
    pub min: NaiveDateTime,
    pub max: NaiveDateTime,
    pub span_days: f64,
    pub mean_interval_days: f64,
    pub frequency: TemporalFrequency,
}

/// Source of an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Composition,
    Correlation,
    Distribution,
    Outlier,
    Regression,
}

/// A finding worth surfacing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    #[serde(rename = "category")]
    pub kind: InsightKind,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    #[serde(rename = "variables")]
    pub columns: Vec<String>,
    /// Figures behind the description, keyed by camelCase name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplementary_metrics: Option<BTreeMap<String, f64>>,
}

/// Keeps the finite entries; `None` when nothing is left.
fn metrics(entries: &[(&str, f64)]) -> Option<BTreeMap<String, f64>> {
    let map: BTreeMap<String, f64> = entries
        .iter()
        .filter(|(_, v)| v.is_finite())
        .map(|&(k, v)| (k.to_string(), v))
        .collect();
    (!map.is_empty()).then_some(map)
}

/// Chart kinds suggested by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Histogram,
    Boxplot,
    Scatter,
    Bar,
}

/// A suggested chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationSuggestion {
    pub chart: ChartType,
    pub columns: Vec<String>,
    pub title: String,
}

/// A stage that failed as a whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageError {
    pub stage: String,
    pub message: String,
}

/// Everything [`auto_analyze`] produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub summary: DatasetSummary,
    pub classifications: Vec<VariableClassification>,
    pub descriptive: DescriptiveStage,
    /// `None` with fewer than two quantitative columns or when the stage failed.
    pub correlation: Option<CorrelationStage>,
    pub regressions: Vec<RegressionEntry>,
    pub distributions: Vec<ColumnEntry<DistributionSummary>>,
    pub outliers: Vec<ColumnEntry<OutlierSummary>>,
    pub temporal: Vec<ColumnEntry<TemporalSummary>>,
    /// Sorted by priority, high first; ties keep collection order.
    pub insights: Vec<Insight>,
    pub visualizations: Vec<VisualizationSuggestion>,
    pub stage_errors: Vec<StageError>,
}

// ── Stages ────────────────────────────────────────────────────────────

/// Row-aligned numeric view of a column; non-numeric cells become `NaN`.
fn aligned_numeric(dataset: &Dataset, name: &str) -> Result<Vec<f64>, StatError> {
    Ok(dataset
        .column(name)?
        .into_iter()
        .map(|c| c.coerce_f64().unwrap_or(f64::NAN))
        .collect())
}

fn categorical_summary(cells: &[&Cell]) -> CategoricalSummary {
    let table = frequency_table(cells);
    CategoricalSummary {
        count: table.total,
        distinct: table.distinct(),
        top: table.top(TOP_CATEGORIES).to_vec(),
        mode: table.mode().map(|e| e.value.clone()),
        concentration: table.mode().map_or(0.0, |e| e.percentage),
    }
}

fn distribution_summary(values: &[f64], alpha: f64) -> Result<DistributionSummary, StatError> {
    let sw = shapiro_wilk(values, alpha)?;
    let skew = skewness(values, false).ok();
    let kurt = kurtosis(values, false, true).ok();
    Ok(DistributionSummary {
        shapiro_wilk: sw,
        skewness: skew,
        kurtosis: kurt,
        class: DistributionClass::classify(sw.is_normal, skew, kurt),
    })
}

fn temporal_summary(cells: &[&Cell]) -> Result<TemporalSummary, StatError> {
    let mut dates: Vec<NaiveDateTime> = cells.iter().filter_map(|c| cell_date(c)).collect();
    if dates.len() < 2 {
        return Err(StatError::InsufficientData {
            min_required: 2,
            actual: dates.len(),
        });
    }
    dates.sort();
    let (min, max) = (dates[0], dates[dates.len() - 1]);
    let span_days = (max - min).num_seconds() as f64 / 86_400.0;
    let mean_interval_days = span_days / (dates.len() - 1) as f64;
    Ok(TemporalSummary {
        count: dates.len(),
        min,
        max,
        span_days,
        mean_interval_days,
        frequency: TemporalFrequency::from_mean_interval(mean_interval_days),
    })
}

fn collect_insights(report: &AnalysisReport) -> Vec<Insight> {
    let mut insights = Vec::new();
    let s = &report.summary;
    let t = &s.type_counts;
    insights.push(Insight {
        kind: InsightKind::Composition,
        priority: Priority::Low,
        title: "Dataset composition".into(),
        description: format!(
            "{} rows and {} columns: {} quantitative, {} qualitative, {} binary, {} ordinal, {} datetime, {} empty",
            s.row_count,
            s.column_count,
            t.quantitative,
            t.qualitative,
            t.binary,
            t.ordinal,
            t.datetime,
            t.empty
        ),
        columns: Vec::new(),
        supplementary_metrics: metrics(&[
            ("rows", s.row_count as f64),
            ("columns", s.column_count as f64),
        ]),
    });

    if let Some(stage) = &report.correlation {
        for pair in &stage.strong {
            let r = pair.correlation;
            insights.push(Insight {
                kind: InsightKind::Correlation,
                priority: if r.abs() > HIGH_CORRELATION {
                    Priority::High
                } else {
                    Priority::Medium
                },
                title: format!("Correlation between {} and {}", pair.column_a, pair.column_b),
                description: format!(
                    "{} {} correlation (r = {:.3}, p = {:.4}, n = {})",
                    if r.abs() > HIGH_CORRELATION { "Strong" } else { "Moderate" },
                    if r > 0.0 { "positive" } else { "negative" },
                    r,
                    pair.p_value,
                    pair.n
                ),
                columns: vec![pair.column_a.clone(), pair.column_b.clone()],
                supplementary_metrics: metrics(&[
                    ("r", r),
                    ("pValue", pair.p_value),
                    ("n", pair.n as f64),
                ]),
            });
        }
    }

    for entry in &report.distributions {
        let Some(d) = &entry.result else { continue };
        if d.shapiro_wilk.is_normal {
            continue;
        }
        insights.push(Insight {
            kind: InsightKind::Distribution,
            priority: Priority::Medium,
            title: format!("{} is not normally distributed", entry.column),
            description: format!(
                "Shapiro-Wilk W = {:.4}, p = {:.4}; the distribution is {}. Prefer nonparametric methods.",
                d.shapiro_wilk.statistic,
                d.shapiro_wilk.p_value,
                d.class.describe()
            ),
            columns: vec![entry.column.clone()],
            supplementary_metrics: metrics(&[
                ("statistic", d.shapiro_wilk.statistic),
                ("pValue", d.shapiro_wilk.p_value),
                ("skewness", d.skewness.unwrap_or(f64::NAN)),
                ("kurtosis", d.kurtosis.unwrap_or(f64::NAN)),
            ]),
        });
    }

    for entry in &report.outliers {
        let Some(o) = &entry.result else { continue };
        if o.severity != Priority::High {
            continue;
        }
        insights.push(Insight {
            kind: InsightKind::Outlier,
            priority: Priority::High,
            title: format!("Many outliers in {}", entry.column),
            description: format!(
                "{} of the values ({:.1}%) fall outside [{:.4}, {:.4}]",
                o.detection.count,
                o.detection.percentage,
                o.detection.lower_bound,
                o.detection.upper_bound
            ),
            columns: vec![entry.column.clone()],
            supplementary_metrics: metrics(&[
                ("count", o.detection.count as f64),
                ("percentage", o.detection.percentage),
                ("lowerBound", o.detection.lower_bound),
                ("upperBound", o.detection.upper_bound),
            ]),
        });
    }

    for entry in &report.regressions {
        let Some(fit) = &entry.result else { continue };
        if !(fit.significant && fit.r_squared > NOTABLE_R_SQUARED) {
            continue;
        }
        insights.push(Insight {
            kind: InsightKind::Regression,
            priority: Priority::Medium,
            title: format!("{} predicts {}", entry.x, entry.y),
            description: format!(
                "{} explains {:.1}% of the variance (p = {:.4})",
                fit.equation,
                fit.r_squared * 100.0,
                fit.p_value
            ),
            columns: vec![entry.x.clone(), entry.y.clone()],
            supplementary_metrics: metrics(&[
                ("slope", fit.slope),
                ("intercept", fit.intercept),
                ("rSquared", fit.r_squared),
                ("pValue", fit.p_value),
            ]),
        });
    }

    // Stable: equal priorities keep collection order.
    insights.sort_by(|a, b| b.priority.cmp(&a.priority));
    insights
}

fn suggest_visualizations(
    report: &AnalysisReport,
    config: &AnalysisConfig,
) -> Vec<VisualizationSuggestion> {
    let mut out = Vec::new();
    for c in report.classifications.iter().filter(|c| c.is_quantitative()) {
        out.push(VisualizationSuggestion {
            chart: ChartType::Histogram,
            columns: vec![c.column.clone()],
            title: format!("Distribution of {}", c.column),
        });
        out.push(VisualizationSuggestion {
            chart: ChartType::Boxplot,
            columns: vec![c.column.clone()],
            title: format!("Spread of {}", c.column),
        });
    }
    if let Some(stage) = &report.correlation {
        for pair in stage.strong.iter().take(config.max_scatter_suggestions) {
            out.push(VisualizationSuggestion {
                chart: ChartType::Scatter,
                columns: vec![pair.column_a.clone(), pair.column_b.clone()],
                title: format!("{} vs {}", pair.column_b, pair.column_a),
            });
        }
    }
    for c in report.classifications.iter().filter(|c| {
        matches!(
            c.variable_type,
            VariableType::Qualitative | VariableType::Binary
        ) && c.distinct > 0
            && c.distinct <= config.max_bar_categories
    }) {
        out.push(VisualizationSuggestion {
            chart: ChartType::Bar,
            columns: vec![c.column.clone()],
            title: format!("Frequency of {}", c.column),
        });
    }
    out
}

// ── Pipeline ──────────────────────────────────────────────────────────

/// Runs the full analysis pipeline.
///
/// # Errors
///
/// Only dataset validation and invalid options abort the analysis:
/// [`StatError::MissingHeaders`], [`StatError::DuplicateHeader`],
/// [`StatError::EmptyDataset`] or [`StatError::InvalidArgument`].
pub fn auto_analyze(
    dataset: &Dataset,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, StatError> {
    config.validate()?;
    let alpha = config.significance_level;

    let validation = validate_dataset(dataset)?;
    tracing::debug!(
        stage = "validate",
        rows = validation.row_count,
        columns = validation.column_count,
        warnings = validation.warnings.len(),
        "stage complete"
    );

    let classifications = classify_dataset(dataset)?;
    tracing::debug!(stage = "classify", columns = classifications.len(), "stage complete");

    let mut report = AnalysisReport {
        summary: DatasetSummary {
            row_count: validation.row_count,
            column_count: validation.column_count,
            type_counts: TypeCounts::tally(&classifications),
            warnings: validation.warnings,
        },
        classifications,
        descriptive: DescriptiveStage::default(),
        correlation: None,
        regressions: Vec::new(),
        distributions: Vec::new(),
        outliers: Vec::new(),
        temporal: Vec::new(),
        insights: Vec::new(),
        visualizations: Vec::new(),
        stage_errors: Vec::new(),
    };

    let quantitative: Vec<String> = report
        .classifications
        .iter()
        .filter(|c| c.is_quantitative())
        .map(|c| c.column.clone())
        .collect();

    // Descriptive
    let mut numeric: Vec<(String, Result<Vec<f64>, StatError>)> = Vec::new();
    for name in &quantitative {
        let values = dataset.numeric_column(name);
        let summary = values.as_ref().map_err(Clone::clone).and_then(|v| describe(v));
        report
            .descriptive
            .quantitative
            .push(ColumnEntry::from_result("descriptive", name, summary));
        numeric.push((name.clone(), values));
    }
    for c in report.classifications.iter().filter(|c| c.is_categorical()) {
        let summary = dataset.column(&c.column).map(|cells| categorical_summary(&cells));
        report
            .descriptive
            .categorical
            .push(ColumnEntry::from_result("descriptive", &c.column, summary));
    }
    tracing::debug!(
        stage = "descriptive",
        columns = report.descriptive.quantitative.len() + report.descriptive.categorical.len(),
        "stage complete"
    );

    // Correlation
    if quantitative.len() >= 2 {
        let matrix = quantitative
            .iter()
            .map(|name| aligned_numeric(dataset, name))
            .collect::<Result<Vec<_>, _>>()
            .and_then(|cols| {
                correlation_matrix(&cols, &quantitative, CorrelationMethod::Pearson, alpha)
            });
        match matrix {
            Ok(matrix) => {
                let strong = matrix.strong_pairs(config.min_correlation_threshold);
                tracing::debug!(
                    stage = "correlation",
                    columns = quantitative.len(),
                    strong = strong.len(),
                    "stage complete"
                );
                report.correlation = Some(CorrelationStage { matrix, strong });
            }
            Err(e) => {
                tracing::warn!(stage = "correlation", error = %e, "stage failed");
                report.stage_errors.push(StageError {
                    stage: "correlation".into(),
                    message: e.to_string(),
                });
            }
        }
    }

    if config.include_advanced_analysis {
        // Regression
        if let Some(stage) = &report.correlation {
            for pair in stage
                .strong
                .iter()
                .filter(|p| p.correlation.abs() > config.regression_threshold)
                .take(config.max_regressions)
            {
                let fit = aligned_numeric(dataset, &pair.column_a).and_then(|x| {
                    let y = aligned_numeric(dataset, &pair.column_b)?;
                    linear_regression(&x, &y, alpha)
                });
                let (result, error) = match fit {
                    Ok(r) => (Some(r), None),
                    Err(e) => {
                        tracing::warn!(
                            stage = "regression",
                            x = %pair.column_a,
                            y = %pair.column_b,
                            error = %e,
                            "pair failed"
                        );
                        (None, Some(e.to_string()))
                    }
                };
                report.regressions.push(RegressionEntry {
                    x: pair.column_a.clone(),
                    y: pair.column_b.clone(),
                    result,
                    error,
                });
            }
            tracing::debug!(
                stage = "regression",
                pairs = report.regressions.len(),
                "stage complete"
            );
        }

        // Distribution
        for (name, values) in &numeric {
            let Ok(values) = values else { continue };
            if values.len() > MIN_DISTRIBUTION_N {
                report.distributions.push(ColumnEntry::from_result(
                    "distribution",
                    name,
                    distribution_summary(values, alpha),
                ));
            }
        }
        tracing::debug!(
            stage = "distribution",
            columns = report.distributions.len(),
            "stage complete"
        );
    }

    // Outliers
    for (name, values) in &numeric {
        let Ok(values) = values else { continue };
        if values.len() > MIN_OUTLIER_N {
            let summary =
                detect_outliers(values, OutlierMethod::Iqr).map(|detection| OutlierSummary {
                    severity: outlier_severity(detection.percentage),
                    detection,
                });
            report
                .outliers
                .push(ColumnEntry::from_result("outliers", name, summary));
        }
    }
    tracing::debug!(stage = "outliers", columns = report.outliers.len(), "stage complete");

    // Temporal
    for c in report
        .classifications
        .iter()
        .filter(|c| c.variable_type == VariableType::Datetime)
    {
        let summary = dataset.column(&c.column).and_then(|cells| temporal_summary(&cells));
        report
            .temporal
            .push(ColumnEntry::from_result("temporal", &c.column, summary));
    }
    tracing::debug!(stage = "temporal", columns = report.temporal.len(), "stage complete");

    report.insights = collect_insights(&report);
    tracing::debug!(stage = "insights", insights = report.insights.len(), "stage complete");

    if config.generate_visualizations {
        report.visualizations = suggest_visualizations(&report, config);
        tracing::debug!(
            stage = "visualizations",
            suggestions = report.visualizations.len(),
            "stage complete"
        );
    }

    Ok(report)
}
