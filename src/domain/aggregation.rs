//! Per-level score aggregation rules.
//!
//! Level 2 (risk summary) takes the maximum of its children, levels 3 to 5
//! take the arithmetic mean. No other level has a rule.

use std::fmt;

use crate::domain::error::{DomainError, DomainResult};

/// Level of a leaf assessment item.
pub const LEAF_LEVEL: u32 = 5;

/// How child scores combine into a parent score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationRule {
    Max,
    Mean,
}

const RULES: [(u32, AggregationRule); 4] = [
    (2, AggregationRule::Max),
    (3, AggregationRule::Mean),
    (4, AggregationRule::Mean),
    (5, AggregationRule::Mean),
];

impl AggregationRule {
    /// Look up the rule for `level`.
    pub fn for_level(level: u32) -> DomainResult<Self> {
        RULES
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, rule)| *rule)
            .ok_or(DomainError::UnsupportedLevel(level))
    }

    /// Combine `scores` under this rule.
    ///
    /// NaN inputs propagate to the result for both rules.
    /// `Max` over an empty slice is an error, `Mean` over an empty slice is NaN.
    pub fn apply(self, scores: &[f64], level: u32) -> DomainResult<f64> {
        match self {
            AggregationRule::Max => {
                if scores.is_empty() {
                    return Err(DomainError::EmptyInput { level });
                }
                if scores.iter().any(|s| s.is_nan()) {
                    return Ok(f64::NAN);
                }
                Ok(scores.iter().copied().fold(f64::NEG_INFINITY, f64::max))
            }
            AggregationRule::Mean => {
                if scores.is_empty() {
                    return Ok(f64::NAN);
                }
                Ok(scores.iter().sum::<f64>() / scores.len() as f64)
            }
        }
    }
}

impl fmt::Display for AggregationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationRule::Max => write!(f, "max"),
            AggregationRule::Mean => write!(f, "mean"),
        }
    }
}

/// Aggregate `children_scores` into a single parent score for a node at `level`.
pub fn aggregate(children_scores: &[f64], level: u32) -> DomainResult<f64> {
    AggregationRule::for_level(level)?.apply(children_scores, level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_table_covers_levels_two_to_five() {
        assert_eq!(AggregationRule::for_level(2), Ok(AggregationRule::Max));
        for level in 3..=5 {
            assert_eq!(AggregationRule::for_level(level), Ok(AggregationRule::Mean));
        }
        assert_eq!(
            AggregationRule::for_level(1),
            Err(DomainError::UnsupportedLevel(1))
        );
    }

    #[test]
    fn test_max_propagates_nan() {
        let result = aggregate(&[1.0, f64::NAN, 3.0], 2).unwrap();
        assert!(result.is_nan());
    }
}
