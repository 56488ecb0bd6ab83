//! Error types for u-statlab.
//!
//! Three kinds of failure are surfaced as [`StatError`]: structural problems
//! with a dataset or argument shape, numeric domain violations, and samples
//! that are too small for the requested operation. Degenerate inputs
//! (constant samples, zero standard error) are *not* errors; they produce a
//! sentinel result whose `error` field holds a [`Degeneracy`].

use serde::Serialize;
use thiserror::Error;

/// All errors produced by u-statlab operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatError {
    /// Insufficient data for the requested operation.
    #[error("need at least {min_required} values, got {actual}")]
    InsufficientData { min_required: usize, actual: usize },
    /// No finite numeric values remained after filtering.
    #[error("no finite numeric values")]
    NoFiniteValues,
    /// Dimension mismatch between parallel inputs.
    #[error("expected {expected} elements, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// Column not found in the dataset.
    #[error("column '{name}' not found")]
    ColumnNotFound { name: String },
    /// Dataset declares no headers.
    #[error("dataset has no headers")]
    MissingHeaders,
    /// Dataset declares the same header twice.
    #[error("duplicate header '{name}'")]
    DuplicateHeader { name: String },
    /// Dataset has no rows.
    #[error("dataset has no rows")]
    EmptyDataset,
    /// A probability argument lies outside its open interval.
    #[error("probability {p} outside (0, 1)")]
    ProbabilityOutOfRange { p: f64 },
    /// A strictly positive value was required.
    #[error("value {value} is not strictly positive")]
    NonPositiveValue { value: f64 },
    /// An argument violates its documented domain.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },
    /// Input could not be decoded as a dataset.
    #[error("invalid dataset JSON: {0}")]
    InvalidJson(String),
}

/// Coarse error taxonomy used by callers to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Dataset or argument shape violation.
    Structural,
    /// Numeric precondition violation.
    Domain,
    /// Sample too small for the requested computation.
    InsufficientData,
}

impl StatError {
    /// Returns the taxonomy bucket for this error.
    ///
    /// ```
    /// use u_statlab::error::{ErrorKind, StatError};
    ///
    /// let err = StatError::ProbabilityOutOfRange { p: 1.5 };
    /// assert_eq!(err.kind(), ErrorKind::Domain);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientData { .. } | Self::NoFiniteValues => ErrorKind::InsufficientData,
            Self::ProbabilityOutOfRange { .. }
            | Self::NonPositiveValue { .. }
            | Self::InvalidArgument { .. } => ErrorKind::Domain,
            Self::DimensionMismatch { .. }
            | Self::ColumnNotFound { .. }
            | Self::MissingHeaders
            | Self::DuplicateHeader { .. }
            | Self::EmptyDataset
            | Self::InvalidJson(_) => ErrorKind::Structural,
        }
    }

    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for StatError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidJson(e.to_string())
    }
}

/// Reason a test produced a sentinel (NaN) result instead of a statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
pub enum Degeneracy {
    /// Every observation has the same value.
    #[error("all values are identical")]
    ConstantSample,
    /// The standard error of the statistic is zero.
    #[error("standard error is zero")]
    ZeroStandardError,
    /// Within-group mean square is zero.
    #[error("within-group variance is zero")]
    ZeroWithinGroupVariance,
    /// A predictor or variable has zero variance.
    #[error("variance is zero")]
    ZeroVariance,
    /// Sample skewness is exactly zero, which the skewness transform cannot handle.
    #[error("sample is perfectly symmetric")]
    SymmetricSample,
}
