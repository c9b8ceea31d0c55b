//! Check vocabulary and the rule table shape

use crate::graph_view::GraphView;
use crate::metrics::MetricSnapshot;
use crate::scale_tier::{ScaleTier, TierThresholds, ValidationContext};
use archsim_model::{ComponentProfile, Node, NodeId, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ternary result of a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckOutcome {
    /// Meets expectations for the tier
    Pass,
    /// Acceptable now, needed later
    Advisory,
    /// Falls short for the tier
    Fail,
}

/// Importance of a check result, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    /// Blocks production readiness
    Critical,
    /// Should be addressed
    Warning,
    /// Informational
    Info,
}

/// Scoring dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dimension {
    /// Redundancy and failure tolerance
    Reliability,
    /// Latency and capacity
    Performance,
    /// Durability and consistency
    DataIntegrity,
    /// Exposure and access control
    Security,
    /// Monitoring, logging, tracing
    Observability,
    /// AI best practices
    Ai,
}

impl Dimension {
    /// All dimensions in report order
    pub const ALL: [Dimension; 6] = [
        Self::Reliability,
        Self::Performance,
        Self::DataIntegrity,
        Self::Security,
        Self::Observability,
        Self::Ai,
    ];

    /// Weight in the overall score
    #[must_use]
    pub fn weight(self) -> f64 {
        match self {
            Self::Reliability => 25.0,
            Self::Performance => 20.0,
            Self::DataIntegrity | Self::Security | Self::Ai => 15.0,
            Self::Observability => 10.0,
        }
    }

    /// Display name
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Reliability => "Reliability",
            Self::Performance => "Performance",
            Self::DataIntegrity => "Data Integrity",
            Self::Security => "Security",
            Self::Observability => "Observability",
            Self::Ai => "AI Best Practices",
        }
    }
}

/// Identifier of every validation check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum CheckId {
    SinglePointsOfFailure,
    DatabaseLacksReplica,
    MissingLoadBalancer,
    InsufficientComputeReplicas,
    AvailabilityBelowTarget,
    SingleRegion,
    ManuallyFailedComponents,
    ScenarioComponentsMissing,
    LatencyBudget,
    ThroughputCapacity,
    MissingCache,
    NoAsyncBuffer,
    ExcessiveNetworkHops,
    NoCdn,
    NoBackupStorage,
    MixedConsistency,
    CacheWithoutDurableStore,
    QueueWithoutConsumer,
    OrphanedStorage,
    ClientsReachBackend,
    DatabaseExposed,
    NoAuthentication,
    NoWebFirewall,
    NoRateLimiting,
    NoMonitoring,
    NoCentralizedLogging,
    NoDistributedTracing,
    NoGuardrails,
    NoSemanticCache,
    LlmWithoutRetrieval,
    NoModelFallback,
    NoAiEvaluation,
    GpuSaturation,
}

impl CheckId {
    /// Display name
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::SinglePointsOfFailure => "Single Points of Failure",
            Self::DatabaseLacksReplica => "Database Lacks Replica",
            Self::MissingLoadBalancer => "Missing Load Balancer",
            Self::InsufficientComputeReplicas => "Insufficient Compute Replicas",
            Self::AvailabilityBelowTarget => "Availability Below Target",
            Self::SingleRegion => "Single Region Deployment",
            Self::ManuallyFailedComponents => "Failed Components",
            Self::ScenarioComponentsMissing => "Scenario Components Missing",
            Self::LatencyBudget => "P99 Latency Budget",
            Self::ThroughputCapacity => "Throughput Capacity",
            Self::MissingCache => "Missing Cache Layer",
            Self::NoAsyncBuffer => "No Async Buffer",
            Self::ExcessiveNetworkHops => "Excessive Network Hops",
            Self::NoCdn => "No CDN",
            Self::NoBackupStorage => "No Backup Storage",
            Self::MixedConsistency => "Mixed Consistency Models",
            Self::CacheWithoutDurableStore => "Cache Without Durable Store",
            Self::QueueWithoutConsumer => "Queue Without Consumer",
            Self::OrphanedStorage => "Orphaned Storage",
            Self::ClientsReachBackend => "Clients Reach Backend Directly",
            Self::DatabaseExposed => "Database Exposed to Clients",
            Self::NoAuthentication => "No Authentication",
            Self::NoWebFirewall => "No Web Application Firewall",
            Self::NoRateLimiting => "No Rate Limiting",
            Self::NoMonitoring => "No Monitoring",
            Self::NoCentralizedLogging => "No Centralized Logging",
            Self::NoDistributedTracing => "No Distributed Tracing",
            Self::NoGuardrails => "No Guardrails",
            Self::NoSemanticCache => "No Semantic Cache",
            Self::LlmWithoutRetrieval => "LLM Without Retrieval Grounding",
            Self::NoModelFallback => "No Model Fallback",
            Self::NoAiEvaluation => "No AI Evaluation",
            Self::GpuSaturation => "GPU Saturation",
        }
    }
}

/// One evaluated check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    /// Which check ran
    pub id: CheckId,
    /// Dimension it scores in
    pub dimension: Dimension,
    /// Display name
    pub name: String,
    /// Result
    pub outcome: CheckOutcome,
    /// Importance of the result
    pub severity: Severity,
    /// Weight within the dimension
    pub score_impact: f64,
    /// Explanation
    pub message: String,
    /// Suggested fix
    pub recommendation: Option<String>,
}

impl Check {
    /// Check passed
    #[inline]
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcome == CheckOutcome::Pass
    }

    /// Check failed
    #[inline]
    #[must_use]
    pub fn failed(&self) -> bool {
        self.outcome == CheckOutcome::Fail
    }
}

/// Result of evaluating one rule, before it is bound to its table entry
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Finding {
    pub(crate) outcome: CheckOutcome,
    pub(crate) severity: Severity,
    pub(crate) message: String,
    pub(crate) recommendation: Option<String>,
}

impl Finding {
    pub(crate) fn pass(severity: Severity, message: impl Into<String>) -> Self {
        Self::new(CheckOutcome::Pass, severity, message)
    }

    pub(crate) fn advisory(severity: Severity, message: impl Into<String>) -> Self {
        Self::new(CheckOutcome::Advisory, severity, message)
    }

    pub(crate) fn fail(severity: Severity, message: impl Into<String>) -> Self {
        Self::new(CheckOutcome::Fail, severity, message)
    }

    fn new(outcome: CheckOutcome, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            outcome,
            severity,
            message: message.into(),
            recommendation: None,
        }
    }

    pub(crate) fn recommend(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }
}

/// Everything a rule may inspect
pub(crate) struct CheckInput<'a> {
    pub(crate) view: &'a GraphView<'a>,
    pub(crate) spof_ids: &'a BTreeSet<NodeId>,
    pub(crate) metrics: &'a MetricSnapshot,
    pub(crate) ctx: &'a ValidationContext,
}

impl<'a> CheckInput<'a> {
    #[inline]
    pub(crate) fn tier(&self) -> ScaleTier {
        self.ctx.scale_tier
    }

    #[inline]
    pub(crate) fn thresholds(&self) -> &TierThresholds {
        &self.ctx.thresholds
    }

    /// Known nodes whose role satisfies `pred`
    pub(crate) fn nodes_where(
        &self,
        pred: impl Fn(&ComponentProfile) -> bool,
    ) -> Vec<(&'a Node, &'a ComponentProfile)> {
        self.view.known().filter(|(_, p)| pred(p)).collect()
    }

    pub(crate) fn has(&self, pred: impl Fn(&ComponentProfile) -> bool) -> bool {
        self.view.known().any(|(_, p)| pred(p))
    }

    pub(crate) fn has_role(&self, role: Role) -> bool {
        self.has(|p| p.role == role)
    }

    /// Profile of a node id
    pub(crate) fn profile(&self, id: NodeId) -> Option<&'a ComponentProfile> {
        self.view.profile(id)
    }
}

/// Evaluation function; `None` means the check does not apply
pub(crate) type Evaluate = fn(&CheckInput<'_>) -> Option<Finding>;

/// One entry of a dimension's rule table
pub(crate) struct Rule {
    pub(crate) id: CheckId,
    pub(crate) score_impact: f64,
    pub(crate) evaluate: Evaluate,
}

/// Comma separated labels of up to five nodes
pub(crate) fn labels<'n>(nodes: impl IntoIterator<Item = &'n Node>) -> String {
    let all: Vec<&str> = nodes.into_iter().map(Node::label).collect();
    if all.len() > 5 {
        format!("{} and {} more", all[..5].join(", "), all.len() - 5)
    } else {
        all.join(", ")
    }
}

/// Pick a severity by tier band
pub(crate) fn by_tier(tier: ScaleTier, at_or_above: ScaleTier, high: Severity, low: Severity) -> Severity {
    if tier >= at_or_above {
        high
    } else {
        low
    }
}
