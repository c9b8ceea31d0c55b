//! Scale-tier resolution
//!
//! Four independent classifiers each place the architecture in a tier:
//! - traffic: requests per second
//! - complexity: weighted structural point score
//! - component mix: presence of indicator roles
//! - scenario: fixed lookup on the active scenario id
//!
//! The resolved tier is the most demanding of the four. Every validation
//! check reads its expectations from the resolved [`TierThresholds`].

use crate::metrics::MetricSnapshot;
use archsim_model::{Catalog, Category, Edge, Node, Role, Scenario, TrafficPattern};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Operating scale, ordered from least to most demanding
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleTier {
    /// Proof of concept, a handful of users
    #[default]
    Prototype,
    /// Early product with real users
    Startup,
    /// Product with steady growth
    Growth,
    /// Large user base, regional presence
    Scale,
    /// Global, regulated or mission critical
    Enterprise,
}

impl ScaleTier {
    /// All tiers, least demanding first
    pub const ALL: [ScaleTier; 5] = [
        Self::Prototype,
        Self::Startup,
        Self::Growth,
        Self::Scale,
        Self::Enterprise,
    ];

    /// Stable identifier
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prototype => "prototype",
            Self::Startup => "startup",
            Self::Growth => "growth",
            Self::Scale => "scale",
            Self::Enterprise => "enterprise",
        }
    }

    /// Default expectations for this tier
    #[must_use]
    pub fn thresholds(self) -> TierThresholds {
        let (max_p99_ms, min_availability, replicas_for_ha, production) = match self {
            Self::Prototype => (2000.0, 0.99, 1, false),
            Self::Startup => (1000.0, 0.995, 1, false),
            Self::Growth => (500.0, 0.999, 2, true),
            Self::Scale => (300.0, 0.9995, 2, true),
            Self::Enterprise => (200.0, 0.9999, 3, true),
        };
        TierThresholds {
            max_p99_ms,
            min_availability,
            replicas_for_ha,
            requires_load_balancer: production,
            requires_cache: production,
            requires_observability: production,
            requires_guardrails: production,
        }
    }
}

impl std::fmt::Display for ScaleTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expectations applied by the validator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    /// Maximum acceptable P99 latency
    pub max_p99_ms: f64,
    /// Minimum acceptable availability
    pub min_availability: f64,
    /// Replicas a compute node needs to count as highly available
    pub replicas_for_ha: u32,
    /// A load balancer must front compute
    pub requires_load_balancer: bool,
    /// A cache must front storage
    pub requires_cache: bool,
    /// Monitoring and logging must be present
    pub requires_observability: bool,
    /// Model calls must pass through guardrails
    pub requires_guardrails: bool,
}

/// Resolved tier with the evidence behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationContext {
    /// Most demanding of the classifier tiers
    pub scale_tier: ScaleTier,
    /// Tier implied by the traffic load
    pub traffic_tier: ScaleTier,
    /// Tier implied by the structural point score
    pub complexity_tier: ScaleTier,
    /// Tier implied by the component mix
    pub mix_tier: ScaleTier,
    /// Tier implied by the active scenario
    pub scenario_tier: ScaleTier,
    /// Structural complexity points
    pub complexity_points: u32,
    /// Thresholds after scenario overrides
    pub thresholds: TierThresholds,
    /// Requests per second being validated
    pub traffic_load: f64,
    /// Shape of the traffic
    pub traffic_pattern: TrafficPattern,
    /// Active scenario id
    pub scenario_id: Option<String>,
    /// Component kinds the active scenario requires
    pub required_kinds: Vec<String>,
    /// Latency budget left, negative when over budget
    pub latency_headroom_ms: f64,
    /// Availability above the minimum, negative when short
    pub availability_headroom: f64,
}

/// Classify requests per second
#[must_use]
pub fn traffic_tier(traffic_load: f64) -> ScaleTier {
    match traffic_load {
        l if l <= 500.0 => ScaleTier::Prototype,
        l if l <= 5_000.0 => ScaleTier::Startup,
        l if l <= 50_000.0 => ScaleTier::Growth,
        l if l <= 500_000.0 => ScaleTier::Scale,
        _ => ScaleTier::Enterprise,
    }
}

/// Structural point score of a graph
#[must_use]
pub fn complexity_points(catalog: &Catalog, nodes: &[Node], edges: &[Edge]) -> u32 {
    let known: Vec<(&Node, Role, Category)> = nodes
        .iter()
        .filter_map(|n| catalog.profile_of(n).map(|p| (n, p.role, p.category)))
        .collect();
    let count = |pred: &dyn Fn(Role, Category) -> bool| {
        known.iter().filter(|(_, r, c)| pred(*r, *c)).count()
    };

    let mut points = 0;
    points += [3, 8, 15].iter().filter(|&&t| nodes.len() >= t).count() as u32;
    points += [10, 20].iter().filter(|&&t| edges.len() >= t).count() as u32;

    let compute: u32 = known
        .iter()
        .filter(|(_, _, c)| *c == Category::Compute)
        .map(|(n, _, _)| n.replicas())
        .sum();
    points += [3, 5].iter().filter(|&&t| compute >= t).count() as u32;

    let database_kinds: BTreeSet<&str> = known
        .iter()
        .filter(|(_, r, _)| r.is_database())
        .map(|(n, _, _)| n.kind.as_str())
        .collect();
    if database_kinds.len() >= 2 {
        points += 2;
    }
    if count(&|r, _| r.is_queue()) > 0 {
        points += 1;
    }
    if count(&|r, _| r == Role::Cdn) > 0 {
        points += 1;
    }
    let regions: BTreeSet<&str> = nodes.iter().map(|n| n.config.region.as_str()).collect();
    if regions.len() >= 2 {
        points += 2;
    }
    if count(&|r, _| r.is_ml_ops()) > 0 {
        points += 2;
    }
    if count(&|_, c| c == Category::Observability) >= 2 {
        points += 1;
    }
    if count(&|r, _| r.is_advanced_ai()) >= 2 {
        points += 1;
    }
    points
}

/// Bucket a structural point score
#[must_use]
pub fn complexity_tier(points: u32) -> ScaleTier {
    match points {
        0..=1 => ScaleTier::Prototype,
        2..=4 => ScaleTier::Startup,
        5..=7 => ScaleTier::Growth,
        8..=11 => ScaleTier::Scale,
        _ => ScaleTier::Enterprise,
    }
}

const ENTERPRISE_INDICATORS: &[Role] = &[
    Role::TrainingCluster,
    Role::DriftDetector,
    Role::AbTestController,
    Role::FeatureStore,
    Role::Warehouse,
];

const SCALE_INDICATORS: &[Role] = &[
    Role::Stream,
    Role::WideColumnDatabase,
    Role::GpuInference,
    Role::ModelRegistry,
];

const GROWTH_INDICATORS: &[Role] = &[
    Role::Cache,
    Role::LoadBalancer,
    Role::ApiGateway,
    Role::Cdn,
    Role::Queue,
];

/// Tier implied by the most advanced component present
#[must_use]
pub fn mix_tier(catalog: &Catalog, nodes: &[Node]) -> ScaleTier {
    let roles: BTreeSet<Role> = nodes
        .iter()
        .filter_map(|n| catalog.profile_of(n).map(|p| p.role))
        .collect();
    let any = |indicators: &[Role]| indicators.iter().any(|r| roles.contains(r));
    if any(ENTERPRISE_INDICATORS) {
        ScaleTier::Enterprise
    } else if any(SCALE_INDICATORS) {
        ScaleTier::Scale
    } else if any(GROWTH_INDICATORS) {
        ScaleTier::Growth
    } else {
        ScaleTier::Prototype
    }
}

const SCENARIO_TIERS: &[(&str, ScaleTier)] = &[
    ("todo-app", ScaleTier::Prototype),
    ("portfolio-site", ScaleTier::Prototype),
    ("basic-web-app", ScaleTier::Startup),
    ("url-shortener", ScaleTier::Startup),
    ("chatbot", ScaleTier::Startup),
    ("ecommerce", ScaleTier::Growth),
    ("social-feed", ScaleTier::Growth),
    ("rag-assistant", ScaleTier::Growth),
    ("video-streaming", ScaleTier::Scale),
    ("ride-sharing", ScaleTier::Scale),
    ("realtime-chat", ScaleTier::Scale),
    ("ai-agent-platform", ScaleTier::Scale),
    ("global-payments", ScaleTier::Enterprise),
    ("ml-platform", ScaleTier::Enterprise),
];

/// Tier implied by the active scenario, startup when absent or unmapped
#[must_use]
pub fn scenario_tier(scenario: Option<&Scenario>) -> ScaleTier {
    scenario
        .and_then(|s| SCENARIO_TIERS.iter().find(|(id, _)| *id == s.id))
        .map_or(ScaleTier::Startup, |(_, tier)| *tier)
}

/// Resolve the operating tier and thresholds for a validation run
#[must_use]
pub fn resolve_validation_context(
    catalog: &Catalog,
    nodes: &[Node],
    edges: &[Edge],
    metrics: &MetricSnapshot,
    traffic_load: f64,
    traffic_pattern: TrafficPattern,
    scenario: Option<&Scenario>,
) -> ValidationContext {
    let points = complexity_points(catalog, nodes, edges);
    let traffic = traffic_tier(traffic_load);
    let complexity = complexity_tier(points);
    let mix = mix_tier(catalog, nodes);
    let from_scenario = scenario_tier(scenario);
    let scale_tier = traffic.max(complexity).max(mix).max(from_scenario);

    let mut thresholds = scale_tier.thresholds();
    if let Some(scenario) = scenario {
        if let Some(p99) = scenario.target_p99_ms {
            thresholds.max_p99_ms = p99;
        }
        if let Some(availability) = scenario.target_availability {
            thresholds.min_availability = availability;
        }
    }

    tracing::debug!(
        tier = %scale_tier,
        traffic = %traffic,
        complexity = %complexity,
        mix = %mix,
        scenario = %from_scenario,
        points,
        "scale tier resolved"
    );

    ValidationContext {
        scale_tier,
        traffic_tier: traffic,
        complexity_tier: complexity,
        mix_tier: mix,
        scenario_tier: from_scenario,
        complexity_points: points,
        latency_headroom_ms: thresholds.max_p99_ms - metrics.latency_p99_ms,
        availability_headroom: metrics.availability - thresholds.min_availability,
        thresholds,
        traffic_load,
        traffic_pattern,
        scenario_id: scenario.map(|s| s.id.clone()),
        required_kinds: scenario.map(|s| s.required_kinds.clone()).unwrap_or_default(),
    }
}
