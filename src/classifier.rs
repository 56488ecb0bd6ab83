//! Variable classification.
//!
//! Assigns every column a statistical variable type by a fixed cascade
//! over its non-null cells:
//!
//! 1. **datetime**: at least 70% of the first 20 cells are dates.
//! 2. **quantitative**: more than 80% of the cells are finite numbers;
//!    `discrete` when at least 90% of those are integers, else `continuous`.
//! 3. **binary**: exactly two distinct values.
//! 4. **ordinal**: every distinct value belongs to one ordered vocabulary
//!    (low/medium/high, small/large, bad/regular/good/excellent, 1–5,
//!    first/second/third), case-insensitively.
//! 5. **qualitative**: everything else; `nominal_many` above ten distinct
//!    values, else `nominal`.
//!
//! Only [`Cell::Number`] cells count as numeric here; numeric-looking text
//! does not.
//!
//! ```
//! use u_statlab::classifier::{classify_variable, VariableSubtype, VariableType};
//! use u_statlab::dataset::Cell;
//!
//! let mut cells: Vec<Cell> = (1..=10).map(Cell::from).collect();
//! cells[3] = Cell::from("4");
//! let refs: Vec<&Cell> = cells.iter().collect();
//! let c = classify_variable("score", &refs);
//! assert_eq!(c.variable_type, VariableType::Quantitative);
//! assert_eq!(c.subtype, Some(VariableSubtype::Discrete));
//! ```

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::dataset::{Cell, Dataset};
use crate::error::StatError;

/// Cells inspected by the date check.
const DATE_PREFIX: usize = 20;
/// Share of the prefix that must parse as dates.
const DATE_RATIO: f64 = 0.7;
/// Numeric share above which a column is quantitative.
const NUMERIC_RATIO: f64 = 0.8;
/// Integer share at or above which a quantitative column is discrete.
const INTEGER_RATIO: f64 = 0.9;
/// Distinct values above which a nominal column is `nominal_many`.
const MANY_CATEGORIES: usize = 10;

lazy_static! {
    static ref ORDINAL_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"^(low|medium|high)$").unwrap(),
        Regex::new(r"^(small|large)$").unwrap(),
        Regex::new(r"^(bad|regular|good|excellent)$").unwrap(),
        Regex::new(r"^[1-5]$").unwrap(),
        Regex::new(r"^(first|second|third)$").unwrap(),
    ];
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

// ── Date Parsing ──────────────────────────────────────────────────────

/// Parses a calendar date or timestamp.
///
/// Accepts RFC 3339, RFC 2822, ISO-8601 dates and date-times, and common
/// forms such as `03/15/2024`, `15.03.2024` and `Mar 15, 2024`. Offsets
/// are converted to UTC.
///
/// ```
/// use u_statlab::classifier::parse_date;
///
/// assert!(parse_date("2024-03-15").is_some());
/// assert!(parse_date("2024-03-15T10:30:00Z").is_some());
/// assert!(parse_date("Mar 15, 2024").is_some());
/// assert!(parse_date("2024-02-30").is_none());
/// assert!(parse_date("42").is_none());
/// ```
pub fn parse_date(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Returns the date held by a text cell.
pub fn cell_date(cell: &Cell) -> Option<NaiveDateTime> {
    cell.as_text().and_then(parse_date)
}

// ── Classification ────────────────────────────────────────────────────

/// Statistical variable type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    Quantitative,
    Qualitative,
    Binary,
    Ordinal,
    Datetime,
    /// No non-null values.
    Empty,
}

/// Refinement of quantitative and qualitative types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableSubtype {
    Discrete,
    Continuous,
    Nominal,
    NominalMany,
}

/// Observed range of a quantitative column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

/// Classification of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableClassification {
    #[serde(rename = "name")]
    pub column: String,
    #[serde(rename = "type")]
    pub variable_type: VariableType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<VariableSubtype>,
    /// Non-null cells.
    pub count: usize,
    /// Distinct non-null labels.
    #[serde(rename = "uniqueCount")]
    pub distinct: usize,
    /// Share of non-null cells that are finite numbers.
    pub numeric_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<NumericRange>,
    /// Distinct labels in first-seen order, for categorical columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

impl VariableClassification {
    /// Quantitative columns feed numeric analyses.
    pub fn is_quantitative(&self) -> bool {
        self.variable_type == VariableType::Quantitative
    }

    /// Qualitative, binary and ordinal columns feed frequency analyses.
    pub fn is_categorical(&self) -> bool {
        matches!(
            self.variable_type,
            VariableType::Qualitative | VariableType::Binary | VariableType::Ordinal
        )
    }
}

fn is_ordinal(labels: &[String]) -> bool {
    if labels.is_empty() {
        return false;
    }
    let lowered: Vec<String> = labels.iter().map(|l| l.trim().to_lowercase()).collect();
    ORDINAL_PATTERNS
        .iter()
        .any(|re| lowered.iter().all(|l| re.is_match(l)))
}

/// Classifies one column from its cells; nulls are ignored.
///
/// The result depends only on the cells and their order, so repeated calls
/// return equal records.
pub fn classify_variable(name: &str, cells: &[&Cell]) -> VariableClassification {
    let present: Vec<&Cell> = cells.iter().copied().filter(|c| !c.is_null()).collect();
    let count = present.len();

    let mut seen = HashSet::new();
    let distinct_labels: Vec<String> = present
        .iter()
        .filter_map(|c| c.label())
        .filter(|l| seen.insert(l.clone()))
        .collect();
    let distinct = distinct_labels.len();

    let numbers: Vec<f64> = present.iter().filter_map(|c| c.as_f64()).collect();
    let numeric_ratio = if count == 0 {
        0.0
    } else {
        numbers.len() as f64 / count as f64
    };

    let record = |variable_type: VariableType, subtype, range| VariableClassification {
        column: name.to_string(),
        variable_type,
        subtype,
        count,
        distinct,
        numeric_ratio,
        range,
        categories: matches!(
            variable_type,
            VariableType::Qualitative | VariableType::Binary | VariableType::Ordinal
        )
        .then(|| distinct_labels.clone()),
    };

    if count == 0 {
        return record(VariableType::Empty, None, None);
    }

    let prefix = &present[..count.min(DATE_PREFIX)];
    if !prefix.is_empty() {
        let dates = prefix.iter().filter(|c| cell_date(c).is_some()).count();
        if dates as f64 / prefix.len() as f64 >= DATE_RATIO {
            return record(VariableType::Datetime, None, None);
        }
    }

    if numeric_ratio > NUMERIC_RATIO {
        let integers = numbers.iter().filter(|v| v.fract() == 0.0).count();
        let subtype = if integers as f64 / numbers.len() as f64 >= INTEGER_RATIO {
            VariableSubtype::Discrete
        } else {
            VariableSubtype::Continuous
        };
        let (min, max) = numbers
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        return record(
            VariableType::Quantitative,
            Some(subtype),
            Some(NumericRange { min, max }),
        );
    }

    if distinct == 2 {
        return record(VariableType::Binary, None, None);
    }

    if is_ordinal(&distinct_labels) {
        return record(VariableType::Ordinal, None, None);
    }

    let subtype = if distinct > MANY_CATEGORIES {
        VariableSubtype::NominalMany
    } else {
        VariableSubtype::Nominal
    };
    record(VariableType::Qualitative, Some(subtype), None)
}

/// Classifies every column of `dataset`, in header order.
pub fn classify_dataset(dataset: &Dataset) -> Result<Vec<VariableClassification>, StatError> {
    dataset
        .headers
        .iter()
        .map(|h| Ok(classify_variable(h, &dataset.column(h)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(values: Vec<Cell>) -> VariableClassification {
        let refs: Vec<&Cell> = values.iter().collect();
        classify_variable("col", &refs)
    }

    fn texts(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|&s| Cell::from(s)).collect()
    }

    #[test]
    fn date_formats() {
        for s in [
            "2024-01-31",
            "2024/01/31",
            "01/31/2024",
            "31.01.2024",
            "January 31, 2024",
            "31 Jan 2024",
            "2024-01-31 08:15:00",
            "2024-01-31T08:15:00.250",
            "Wed, 31 Jan 2024 08:15:00 +0000",
            "2024-01-31T08:15:00+09:00",
        ] {
            assert!(parse_date(s).is_some(), "{s}");
        }
        for s in ["", "hello", "2024-13-01", "31/31/2024", "3.5"] {
            assert!(parse_date(s).is_none(), "{s}");
        }
        let utc = parse_date("2024-01-31T08:15:00+09:00").unwrap();
        assert_eq!(utc.to_string(), "2024-01-30 23:15:00");
    }

    #[test]
    fn datetime_needs_seventy_percent() {
        let mut cells = texts(&["2024-01-01", "2024-01-02", "2024-01-03", "x"]);
        assert_eq!(classify(cells.clone()).variable_type, VariableType::Datetime);
        cells.push(Cell::from("y"));
        // 3 of 5 = 60%
        assert_ne!(classify(cells).variable_type, VariableType::Datetime);
    }

    #[test]
    fn numbers_are_not_dates() {
        let cells: Vec<Cell> = (2000..2010).map(Cell::from).collect();
        assert_eq!(classify(cells).variable_type, VariableType::Quantitative);
    }

    #[test]
    fn quantitative_subtypes() {
        let c = classify(vec![1.5.into(), 2.25.into(), 3.0.into(), 4.75.into()]);
        assert_eq!(c.subtype, Some(VariableSubtype::Continuous));
        assert_eq!(c.range, Some(NumericRange { min: 1.5, max: 4.75 }));

        let c = classify(vec![1.into(), Cell::Null, 3.into(), 8.into()]);
        assert_eq!(c.subtype, Some(VariableSubtype::Discrete));
        assert_eq!(c.count, 3);
        assert_eq!(c.numeric_ratio, 1.0);
    }

    #[test]
    fn numeric_share_must_exceed_eighty_percent() {
        let mut cells: Vec<Cell> = (1..=8).map(Cell::from).collect();
        cells.push("a".into());
        cells.push("b".into());
        // 8 of 10 = 80%, not above
        let c = classify(cells);
        assert_eq!(c.variable_type, VariableType::Qualitative);
        assert_eq!(c.subtype, Some(VariableSubtype::Nominal));
    }

    #[test]
    fn binary_before_ordinal() {
        let c = classify(vec![true.into(), false.into(), true.into()]);
        assert_eq!(c.variable_type, VariableType::Binary);
        let c = classify(texts(&["small", "large", "small"]));
        assert_eq!(c.variable_type, VariableType::Binary);
    }

    #[test]
    fn ordinal_vocabularies() {
        let c = classify(texts(&["Low", "high", "MEDIUM", "low"]));
        assert_eq!(c.variable_type, VariableType::Ordinal);
        let c = classify(texts(&["good", "bad", "excellent", "regular"]));
        assert_eq!(c.variable_type, VariableType::Ordinal);
        let c = classify(texts(&["1", "3", "5", "2"]));
        assert_eq!(c.variable_type, VariableType::Ordinal);
        // Mixed vocabularies are not ordered.
        let c = classify(texts(&["low", "first", "high"]));
        assert_eq!(c.variable_type, VariableType::Qualitative);
    }

    #[test]
    fn nominal_many() {
        let labels: Vec<String> = (0..11).map(|i| format!("c{i}")).collect();
        let cells: Vec<Cell> = labels.into_iter().map(Cell::from).collect();
        assert_eq!(classify(cells).subtype, Some(VariableSubtype::NominalMany));
    }

    #[test]
    fn classification_is_stable() {
        let cells = texts(&["a", "b", "c", "a", "2024-01-01"]);
        assert_eq!(classify(cells.clone()), classify(cells));
    }

    #[test]
    fn whole_dataset() {
        let ds = Dataset::from_json(
            r#"{"headers":["n","g"],"data":[{"n":1,"g":"x"},{"n":2,"g":"y"},{"n":3,"g":"x"}]}"#,
        )
        .unwrap();
        let all = classify_dataset(&ds).unwrap();
        assert_eq!(all[0].variable_type, VariableType::Quantitative);
        assert_eq!(all[1].variable_type, VariableType::Binary);
        let json = serde_json::to_value(&all[0]).unwrap();
        assert_eq!(json["type"], "quantitative");
        assert_eq!(json["subtype"], "discrete");
    }

    #[test]
    fn empty_only_without_values() {
        let c = classify(vec![Cell::Null, Cell::Null, Cell::Null]);
        assert_eq!(c.variable_type, VariableType::Empty);
        assert_eq!((c.count, c.distinct), (0, 0));
        assert_eq!(c.subtype, None);
        assert_eq!(c.categories, None);
        assert_eq!(classify(Vec::new()).variable_type, VariableType::Empty);

        let c = classify(vec![Cell::Null, "x".into(), Cell::Null]);
        assert_ne!(c.variable_type, VariableType::Empty);
        let c = classify(vec![Cell::Null, 4.into()]);
        assert_eq!(c.variable_type, VariableType::Quantitative);
        assert!(!c.is_categorical());
    }

    #[test]
    fn categories_in_first_seen_order() {
        let c = classify(texts(&["yes", "no", "yes", "no"]));
        assert_eq!(c.categories, Some(vec!["yes".to_string(), "no".to_string()]));

        let c = classify(texts(&["high", "low", "medium", "low"]));
        assert_eq!(c.variable_type, VariableType::Ordinal);
        assert_eq!(c.categories.as_deref().map(<[String]>::len), Some(3));

        let c = classify(texts(&["red", "green", "blue", "red"]));
        assert_eq!(c.subtype, Some(VariableSubtype::Nominal));
        assert_eq!(c.categories.unwrap(), ["red", "green", "blue"]);

        let c = classify(vec![1.5.into(), 2.5.into(), 3.5.into()]);
        assert_eq!(c.categories, None);
        let c = classify(texts(&["2024-01-01", "2024-01-02"]));
        assert_eq!(c.categories, None);
    }

    #[test]
    fn serialized_field_names() {
        let json = serde_json::to_value(classify(texts(&["a", "b", "a"]))).unwrap();
        assert_eq!(json["name"], "col");
        assert_eq!(json["type"], "binary");
        assert_eq!(json["uniqueCount"], 2);
        assert_eq!(json["categories"], serde_json::json!(["a", "b"]));
        assert!(json.get("column").is_none());
        assert!(json.get("distinct").is_none());

        let json = serde_json::to_value(classify(vec![Cell::Null])).unwrap();
        assert_eq!(json["type"], "empty");
        assert!(json.get("categories").is_none());
    }
}
