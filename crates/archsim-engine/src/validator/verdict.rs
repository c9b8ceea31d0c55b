//! Headline verdict decision table

use crate::scale_tier::ScaleTier;
use serde::{Deserialize, Serialize};

/// Overall framing of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerdictKind {
    /// No critical failures and a high score
    ProductionReady,
    /// No critical failures, some gaps
    FunctionalWithGaps,
    /// No critical failures but a low score
    NeedsWork,
    /// At least one critical failure
    Blocked,
}

/// Badge and headline shown with the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Framing
    pub kind: VerdictKind,
    /// Short badge text
    pub badge: String,
    /// One-line summary
    pub headline: String,
}

/// Choose a verdict from critical failures, score and tier
#[must_use]
pub fn verdict(failed_critical: usize, overall_score: u32, tier: ScaleTier) -> Verdict {
    let (kind, badge, headline) = match (failed_critical, overall_score) {
        (0, 85..) if tier == ScaleTier::Enterprise => (
            VerdictKind::ProductionReady,
            "Enterprise Ready",
            "Built to enterprise standards".to_string(),
        ),
        (0, 85..) => (
            VerdictKind::ProductionReady,
            "Production Ready",
            format!("Ready for production at {tier} scale"),
        ),
        (0, 65..=84) => (
            VerdictKind::FunctionalWithGaps,
            "Functional",
            format!("Works, with gaps to close before {tier} scale"),
        ),
        (0, _) => (
            VerdictKind::NeedsWork,
            "Needs Work",
            format!("Several gaps for {tier} scale"),
        ),
        (1, _) => (
            VerdictKind::Blocked,
            "Not Ready",
            "1 critical issue blocks production".to_string(),
        ),
        (n, _) => (
            VerdictKind::Blocked,
            "Not Ready",
            format!("{n} critical issues block production"),
        ),
    };
    Verdict {
        kind,
        badge: badge.to_string(),
        headline,
    }
}
