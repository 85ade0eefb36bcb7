//! Tests for per-level aggregation rules

use corix::domain::{aggregate, AggregationRule, DomainError};
use rstest::rstest;

#[rstest]
#[case(&[1.0, 5.0, 2.0], 2, 5.0)]
#[case(&[10.0, 20.0, 30.0], 3, 20.0)]
#[case(&[7.5], 4, 7.5)]
#[case(&[2.0, 4.0], 5, 3.0)]
#[case(&[0.0, 0.0], 2, 0.0)]
fn given_scores_when_aggregate_then_applies_level_rule(
    #[case] scores: &[f64],
    #[case] level: u32,
    #[case] expected: f64,
) {
    let result = aggregate(scores, level).unwrap();
    assert!((result - expected).abs() < 1e-9, "got {result}");
}

#[test]
fn given_empty_scores_at_level_2_when_aggregate_then_empty_input() {
    assert_eq!(aggregate(&[], 2), Err(DomainError::EmptyInput { level: 2 }));
}

#[rstest]
#[case(3)]
#[case(4)]
#[case(5)]
fn given_empty_scores_at_mean_level_when_aggregate_then_nan(#[case] level: u32) {
    assert!(aggregate(&[], level).unwrap().is_nan());
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(6)]
fn given_level_without_rule_when_aggregate_then_unsupported(#[case] level: u32) {
    assert_eq!(aggregate(&[1.0], level), Err(DomainError::UnsupportedLevel(level)));
}

#[rstest]
#[case(2)]
#[case(3)]
fn given_nan_input_when_aggregate_then_nan_propagates(#[case] level: u32) {
    assert!(aggregate(&[1.0, f64::NAN, 9.0], level).unwrap().is_nan());
}

#[test]
fn given_levels_when_for_level_then_max_only_at_level_2() {
    assert_eq!(AggregationRule::for_level(2), Ok(AggregationRule::Max));
    for level in 3..=5 {
        assert_eq!(AggregationRule::for_level(level), Ok(AggregationRule::Mean));
    }
}
