//! End-to-end scenarios with known reference values.

use rstest::rstest;
use u_statlab::classifier::{classify_variable, VariableSubtype, VariableType};
use u_statlab::dataset::Cell;
use u_statlab::descriptive::{
    describe, kurtosis, mean, median, quantile, skewness, std_dev, Estimator,
};
use u_statlab::hypothesis::{chi_square_from_table, mann_whitney_u, one_sample_t_test};
use u_statlab::outliers::{detect_outliers, OutlierMethod};

const SAMPLE: [f64; 8] = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

fn close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() < tol,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn summary_of_classic_sample() {
    close(mean(&SAMPLE).unwrap(), 5.0, 1e-12);
    close(median(&SAMPLE).unwrap(), 4.5, 1e-12);
    close(std_dev(&SAMPLE, Estimator::Population).unwrap(), 2.0, 1e-12);
    close(std_dev(&SAMPLE, Estimator::Sample).unwrap(), (32.0f64 / 7.0).sqrt(), 1e-12);

    let s = describe(&SAMPLE).unwrap();
    assert_eq!(s.count, 8);
    close(s.iqr, s.q3 - s.q1, 1e-12);
}

#[rstest]
#[case(true, 0.65625)]
#[case(false, 0.818_487)]
fn skewness_estimators(#[case] bias: bool, #[case] expected: f64) {
    close(skewness(&SAMPLE, bias).unwrap(), expected, 1e-5);
}

#[rstest]
#[case(true, -0.21875)]
#[case(false, 0.940_625)]
fn excess_kurtosis_estimators(#[case] bias: bool, #[case] expected: f64) {
    close(kurtosis(&SAMPLE, bias, true).unwrap(), expected, 1e-5);
}

#[rstest]
#[case(0.25, 2.0)]
#[case(0.5, 3.0)]
#[case(0.75, 4.0)]
fn quartiles_of_one_to_five(#[case] q: f64, #[case] expected: f64) {
    close(quantile(&[1.0, 2.0, 3.0, 4.0, 5.0], q).unwrap(), expected, 1e-12);
}

#[test]
fn one_sample_t() {
    let r = one_sample_t_test(&[5.0, 5.0, 6.0, 6.0, 7.0, 7.0], 5.0, 0.05).unwrap();
    close(r.t_statistic, 2.738_613, 1e-5);
    assert_eq!(r.df, 5.0);
    close(r.p_value, 0.040_89, 1e-4);
    assert!(r.significant);
}

#[test]
fn chi_square_two_by_two() {
    let r = chi_square_from_table(&[vec![10.0, 20.0], vec![20.0, 10.0]], 0.05).unwrap();
    close(r.statistic, 6.666_667, 1e-5);
    assert_eq!(r.df, 1.0);
    close(r.p_value, 0.009_823, 1e-5);
    assert!(r.warnings.is_empty());
}

#[test]
fn mann_whitney_interleaved() {
    let r = mann_whitney_u(&[1.0, 3.0, 5.0, 7.0], &[2.0, 4.0, 6.0, 8.0], 0.05).unwrap();
    assert_eq!(r.u1, 6.0);
    assert_eq!(r.u2, 10.0);
    assert_eq!(r.u_statistic, 6.0);
    assert!(!r.significant);
}

#[test]
fn iqr_outlier() {
    let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
    let r = detect_outliers(&data, OutlierMethod::Iqr).unwrap();
    assert_eq!(r.count, 1);
    assert_eq!(r.outliers, vec![100.0]);
    assert_eq!(r.indices, vec![9]);
    close(r.percentage, 10.0, 1e-12);
}

#[test]
fn classifier_tolerates_one_text_value() {
    let cells: Vec<Cell> = (1..=10)
        .map(|i| if i == 4 { Cell::from("4") } else { Cell::from(i) })
        .collect();
    let refs: Vec<&Cell> = cells.iter().collect();
    let c = classify_variable("score", &refs);
    assert_eq!(c.variable_type, VariableType::Quantitative);
    assert_eq!(c.subtype, Some(VariableSubtype::Discrete));
    close(c.numeric_ratio, 0.9, 1e-12);
}

#[test]
fn classifier_marks_all_null_column_empty() {
    let cells = vec![Cell::Null; 6];
    let refs: Vec<&Cell> = cells.iter().collect();
    let c = classify_variable("notes", &refs);
    assert_eq!(c.variable_type, VariableType::Empty);
    assert_eq!(c.categories, None);

    let cells = vec![Cell::from("a"), Cell::Null, Cell::from("b"), Cell::from("c")];
    let refs: Vec<&Cell> = cells.iter().collect();
    let c = classify_variable("notes", &refs);
    assert_eq!(c.variable_type, VariableType::Qualitative);
    assert_eq!(c.categories.unwrap(), ["a", "b", "c"]);
}
