//! Dimension and overall scoring

use super::check::{Check, CheckOutcome, Dimension};
use serde::{Deserialize, Serialize};

/// Credit given to an advisory relative to a pass
pub const ADVISORY_CREDIT: f64 = 0.7;

/// Letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Grade an overall score
    #[must_use]
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Self::A,
            80..=89 => Self::B,
            70..=79 => Self::C,
            60..=69 => Self::D,
            _ => Self::F,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(letter)
    }
}

/// Weighted completion of a dimension's checks, 100 when none apply
#[must_use]
pub fn dimension_score(checks: &[Check]) -> f64 {
    let total: f64 = checks.iter().map(|c| c.score_impact).sum();
    if total <= 0.0 {
        return 100.0;
    }
    let earned: f64 = checks
        .iter()
        .map(|c| match c.outcome {
            CheckOutcome::Pass => c.score_impact,
            CheckOutcome::Advisory => ADVISORY_CREDIT * c.score_impact,
            CheckOutcome::Fail => 0.0,
        })
        .sum();
    earned / total * 100.0
}

/// Weighted average of dimension scores, rounded
///
/// Dimensions absent from `scores` drop out of the divisor.
#[must_use]
pub fn overall_score(scores: &[(Dimension, f64)]) -> u32 {
    let weight: f64 = scores.iter().map(|(d, _)| d.weight()).sum();
    if weight <= 0.0 {
        return 100;
    }
    let weighted: f64 = scores.iter().map(|(d, s)| d.weight() * s).sum();
    (weighted / weight).round().clamp(0.0, 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::check::{CheckId, Severity};

    fn check(outcome: CheckOutcome, impact: f64) -> Check {
        Check {
            id: CheckId::NoMonitoring,
            dimension: Dimension::Observability,
            name: String::new(),
            outcome,
            severity: Severity::Warning,
            score_impact: impact,
            message: String::new(),
            recommendation: None,
        }
    }

    #[test]
    fn grade_boundaries() {
        assert_eq!(Grade::from_score(100), Grade::A);
        assert_eq!(Grade::from_score(90), Grade::A);
        assert_eq!(Grade::from_score(89), Grade::B);
        assert_eq!(Grade::from_score(80), Grade::B);
        assert_eq!(Grade::from_score(79), Grade::C);
        assert_eq!(Grade::from_score(60), Grade::D);
        assert_eq!(Grade::from_score(59), Grade::F);
    }

    #[test]
    fn advisory_earns_partial_credit() {
        let checks = vec![
            check(CheckOutcome::Pass, 50.0),
            check(CheckOutcome::Advisory, 30.0),
            check(CheckOutcome::Fail, 20.0),
        ];
        assert!((dimension_score(&checks) - 71.0).abs() < 1e-9);
    }

    #[test]
    fn empty_dimension_scores_full() {
        assert_eq!(dimension_score(&[]), 100.0);
    }

    #[test]
    fn absent_ai_changes_divisor() {
        let without_ai = [
            (Dimension::Reliability, 100.0),
            (Dimension::Performance, 100.0),
            (Dimension::DataIntegrity, 100.0),
            (Dimension::Security, 100.0),
            (Dimension::Observability, 15.0),
        ];
        // (75 * 100 + 10 * 15) / 85 = 90
        assert_eq!(overall_score(&without_ai), 90);
        let mut with_ai = without_ai.to_vec();
        with_ai.push((Dimension::Ai, 0.0));
        // (75 * 100 + 10 * 15) / 100 = 76.5
        assert_eq!(overall_score(&with_ai), 77);
    }
}
