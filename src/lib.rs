//! # u-statlab
//!
//! In-memory statistical analysis for tabular data.
//!
//! u-statlab takes a row-major [`Dataset`](dataset::Dataset) (or plain
//! numeric slices) and produces serializable results for:
//!
//! - **Primitives**: special functions, distribution CDFs and quantiles
//! - **Description**: summaries, frequency and contingency tables, group-by
//! - **Inference**: normality tests, parametric and nonparametric hypothesis tests,
//!   correlation and simple regression
//! - **Automation**: variable classification, a staged auto-analysis pipeline,
//!   and plain-language interpretation of any test result
//!
//! ## Modules
//!
//! - [`special`]: gamma, beta and error functions; normal, t, χ² and F distributions
//! - [`descriptive`]: mean, variance, quantiles, skewness, kurtosis, [`describe`](descriptive::describe)
//! - [`normality`]: Shapiro-Wilk, Jarque-Bera, KS, Anderson-Darling, Lilliefors, D'Agostino K², battery
//! - [`hypothesis`]: t-tests, z-test, one-way ANOVA, χ² independence, Mann-Whitney U
//! - [`analysis`]: Pearson/Spearman correlation, correlation matrix, linear regression
//! - [`outliers`]: IQR, z-score and modified z-score detection
//! - [`tables`]: frequency tables, contingency tables, group-by aggregation
//! - [`resampling`]: bootstrap confidence intervals and row sampling
//! - [`dataset`]: the tabular data model
//! - [`validation`]: input checks shared by all operations
//! - [`classifier`]: variable type inference
//! - [`auto_analysis`]: the end-to-end analysis pipeline
//! - [`interpreter`]: result interpretation
//! - [`error`]: error types
//!
//! ## Quick Start
//!
//! ```
//! use u_statlab::descriptive::describe;
//! use u_statlab::hypothesis::two_sample_t_test;
//!
//! let a = [5.1, 4.9, 5.6, 5.8, 6.0, 5.4];
//! let b = [6.3, 6.9, 7.1, 6.5, 7.4, 6.8];
//!
//! let summary = describe(&a).unwrap();
//! assert_eq!(summary.count, 6);
//!
//! let t = two_sample_t_test(&a, &b, false, u_statlab::DEFAULT_ALPHA).unwrap();
//! assert!(t.significant);
//! ```

pub mod analysis;
pub mod auto_analysis;
pub mod classifier;
pub mod dataset;
pub mod descriptive;
pub mod error;
pub mod hypothesis;
pub mod interpreter;
pub mod normality;
pub mod outliers;
pub mod resampling;
pub mod special;
pub mod tables;
pub mod validation;

pub use error::{Degeneracy, ErrorKind, StatError};

/// Significance level used when none is given.
pub const DEFAULT_ALPHA: f64 = 0.05;
