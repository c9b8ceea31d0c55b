//! Architecture validator
//!
//! Runs every dimension's rule table against one consistent snapshot of the
//! graph. Each rule branches on the resolved [`ScaleTier`] so the same gap can
//! pass, advise or fail depending on the operating scale.
//!
//! ## Scoring
//!
//! - dimension: `(pass + 0.7 * advisory) / applicable`, weighted by impact
//! - overall: weighted average of dimensions, rounded
//! - the AI dimension only exists when AI components do
//!
//! [`ScaleTier`]: crate::scale_tier::ScaleTier

mod ai;
mod check;
mod data_integrity;
mod observability;
mod performance;
mod reliability;
mod scoring;
mod security;
mod verdict;

pub use check::{Check, CheckId, CheckOutcome, Dimension, Severity};
pub use scoring::{dimension_score, overall_score, Grade, ADVISORY_CREDIT};
pub use verdict::{verdict, Verdict, VerdictKind};

use crate::graph_view::GraphView;
use crate::metrics::MetricSnapshot;
use crate::scale_tier::{resolve_validation_context, ValidationContext};
use archsim_model::{Catalog, Category, Edge, Node, NodeId, Scenario, TrafficPattern};
use check::{CheckInput, Rule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maximum number of top issues reported
pub const MAX_TOP_ISSUES: usize = 3;

/// Maximum number of strengths reported
pub const MAX_STRENGTHS: usize = 4;

/// Checks and score of one dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionReport {
    /// Which dimension
    pub dimension: Dimension,
    /// Score in `[0, 100]`
    pub score: f64,
    /// Applicable checks in table order
    pub checks: Vec<Check>,
}

/// Outcome of a validation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Resolved tier and thresholds
    pub context: ValidationContext,
    /// Per-dimension results
    pub dimensions: Vec<DimensionReport>,
    /// Weighted overall score
    pub overall_score: u32,
    /// Letter grade of the overall score
    pub grade: Grade,
    /// Headline framing
    pub verdict: Verdict,
    /// Failing checks with critical severity
    pub failed_critical: usize,
    /// Worst failing checks
    pub top_issues: Vec<Check>,
    /// Notable passing checks
    pub strengths: Vec<Check>,
}

impl ValidationReport {
    /// Look up one dimension
    #[must_use]
    pub fn dimension(&self, dimension: Dimension) -> Option<&DimensionReport> {
        self.dimensions.iter().find(|d| d.dimension == dimension)
    }

    /// Look up one check by id
    #[must_use]
    pub fn check(&self, id: CheckId) -> Option<&Check> {
        self.checks().find(|c| c.id == id)
    }

    /// Every applicable check across dimensions
    pub fn checks(&self) -> impl Iterator<Item = &Check> {
        self.dimensions.iter().flat_map(|d| d.checks.iter())
    }
}

fn rules(dimension: Dimension) -> &'static [Rule] {
    match dimension {
        Dimension::Reliability => reliability::RULES,
        Dimension::Performance => performance::RULES,
        Dimension::DataIntegrity => data_integrity::RULES,
        Dimension::Security => security::RULES,
        Dimension::Observability => observability::RULES,
        Dimension::Ai => ai::RULES,
    }
}

/// Validate an architecture against its resolved operating tier
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn validate(
    catalog: &Catalog,
    nodes: &[Node],
    edges: &[Edge],
    spof_ids: &BTreeSet<NodeId>,
    metrics: &MetricSnapshot,
    traffic_load: f64,
    traffic_pattern: TrafficPattern,
    scenario: Option<&Scenario>,
) -> ValidationReport {
    let ctx = resolve_validation_context(
        catalog,
        nodes,
        edges,
        metrics,
        traffic_load,
        traffic_pattern,
        scenario,
    );
    let view = GraphView::new(catalog, nodes, edges);
    let input = CheckInput {
        view: &view,
        spof_ids,
        metrics,
        ctx: &ctx,
    };

    let has_ai = view.known().any(|(_, p)| p.category == Category::Ai);
    let dimensions: Vec<DimensionReport> = Dimension::ALL
        .into_iter()
        .filter(|&d| d != Dimension::Ai || has_ai)
        .map(|dimension| {
            let checks = if view.is_empty() {
                Vec::new()
            } else {
                run_rules(dimension, &input)
            };
            DimensionReport {
                dimension,
                score: dimension_score(&checks),
                checks,
            }
        })
        .collect();

    let scores: Vec<(Dimension, f64)> = dimensions.iter().map(|d| (d.dimension, d.score)).collect();
    let overall = overall_score(&scores);
    let grade = Grade::from_score(overall);

    let mut failing: Vec<&Check> = dimensions
        .iter()
        .flat_map(|d| d.checks.iter())
        .filter(|c| c.failed())
        .collect();
    let failed_critical = failing.iter().filter(|c| c.severity == Severity::Critical).count();
    failing.sort_by_key(|c| c.severity);
    let top_issues: Vec<Check> = failing.into_iter().take(MAX_TOP_ISSUES).cloned().collect();
    let strengths: Vec<Check> = dimensions
        .iter()
        .flat_map(|d| d.checks.iter())
        .filter(|c| c.passed() && c.severity != Severity::Info)
        .take(MAX_STRENGTHS)
        .cloned()
        .collect();

    tracing::info!(
        tier = %ctx.scale_tier,
        score = overall,
        grade = %grade,
        failed_critical,
        "validation complete"
    );

    ValidationReport {
        verdict: verdict(failed_critical, overall, ctx.scale_tier),
        context: ctx,
        dimensions,
        overall_score: overall,
        grade,
        failed_critical,
        top_issues,
        strengths,
    }
}

fn run_rules(dimension: Dimension, input: &CheckInput<'_>) -> Vec<Check> {
    rules(dimension)
        .iter()
        .filter_map(|rule| {
            let finding = (rule.evaluate)(input)?;
            tracing::trace!(check = ?rule.id, outcome = ?finding.outcome, "check evaluated");
            Some(Check {
                id: rule.id,
                dimension,
                name: rule.id.title().to_string(),
                outcome: finding.outcome,
                severity: finding.severity,
                score_impact: rule.score_impact,
                message: finding.message,
                recommendation: finding.recommendation,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::compute_metrics;
    use crate::topology::analyze_topology;
    use archsim_model::GraphStore;
    use archsim_test_utils::{ai_assistant, basic_web_app, production_web_app};

    fn run(store: &GraphStore, load: f64, pattern: TrafficPattern, scenario: Option<&Scenario>) -> ValidationReport {
        let analysis = analyze_topology(store.catalog(), store.nodes(), store.edges());
        let metrics = compute_metrics(store.catalog(), store.nodes(), store.edges(), load);
        validate(
            store.catalog(),
            store.nodes(),
            store.edges(),
            &analysis.single_points_of_failure,
            &metrics,
            load,
            pattern,
            scenario,
        )
    }

    #[test]
    fn database_replica_depends_on_tier() {
        let store = basic_web_app();
        let low = run(&store, 100.0, TrafficPattern::Steady, None);
        let high = run(&store, 100_000.0, TrafficPattern::Steady, None);
        assert_eq!(
            low.check(CheckId::DatabaseLacksReplica).map(|c| c.outcome),
            Some(CheckOutcome::Advisory)
        );
        assert_eq!(
            high.check(CheckId::DatabaseLacksReplica).map(|c| c.outcome),
            Some(CheckOutcome::Fail)
        );
    }

    #[test]
    fn ai_dimension_only_with_ai_nodes() {
        let plain = run(&basic_web_app(), 100.0, TrafficPattern::Steady, None);
        assert!(plain.dimension(Dimension::Ai).is_none());
        assert_eq!(plain.dimensions.len(), 5);

        let ai = run(&ai_assistant(), 10.0, TrafficPattern::Steady, None);
        assert!(ai.dimension(Dimension::Ai).is_some());
    }

    #[test]
    fn top_issues_sorted_and_capped() {
        let report = run(&basic_web_app(), 100_000.0, TrafficPattern::Spike, None);
        assert!(report.top_issues.len() <= MAX_TOP_ISSUES);
        assert!(report
            .top_issues
            .windows(2)
            .all(|w| w[0].severity <= w[1].severity));
        assert!(report.failed_critical > 0);
        assert_eq!(report.verdict.kind, VerdictKind::Blocked);
    }

    #[test]
    fn strengths_exclude_info() {
        let report = run(&production_web_app(), 1000.0, TrafficPattern::Steady, None);
        assert!(report.strengths.len() <= MAX_STRENGTHS);
        assert!(report.strengths.iter().all(|c| c.passed() && c.severity != Severity::Info));
        assert!(!report.strengths.is_empty());
    }

    #[test]
    fn production_stack_outscores_basic() {
        let basic = run(&basic_web_app(), 1000.0, TrafficPattern::Steady, None);
        let prod = run(&production_web_app(), 1000.0, TrafficPattern::Steady, None);
        assert!(prod.overall_score > basic.overall_score);
    }

    #[test]
    fn empty_graph_scores_defaults() {
        let store = GraphStore::new();
        let report = run(&store, 1000.0, TrafficPattern::Steady, None);
        assert_eq!(report.overall_score, 100);
        assert_eq!(report.grade, Grade::A);
        assert!(report.dimensions.iter().all(|d| d.checks.is_empty() && d.score == 100.0));
        assert!(report.top_issues.is_empty());
    }

    #[test]
    fn missing_scenario_kinds_fail() {
        let store = basic_web_app();
        let scenario = Scenario::new("basic-web-app").with_required_kinds(["web-client", "redis"]);
        let report = run(&store, 100.0, TrafficPattern::Steady, Some(&scenario));
        let check = report.check(CheckId::ScenarioComponentsMissing).unwrap();
        assert!(check.failed());
        assert!(check.message.contains("redis"));
    }
}
