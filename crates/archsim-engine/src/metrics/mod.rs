//! Metrics calculator
//!
//! Pure function of the graph and the traffic load. Combines the topology
//! analysis, the propagated load map and the catalog into one
//! [`MetricSnapshot`]. All figures are heuristics meant for interactive
//! feedback, not queueing-theory results.

mod ai;
mod history;

pub use ai::AiMetrics;
pub use history::{MetricField, MetricsHistory, DEFAULT_HISTORY_CAPACITY};

use crate::graph_view::GraphView;
use crate::propagation::{propagate_view, LoadMap};
use crate::topology::{analyze_view, TopologyAnalysis};
use archsim_model::{
    CapAlignment, Catalog, Category, ComponentProfile, ConsistencyModel, Edge, Node, Role,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ceiling reported for availability
pub const AVAILABILITY_CEILING: f64 = 0.99999;

/// Per-hop network latency in milliseconds
pub const HOP_LATENCY_MS: f64 = 2.0;

/// Latency multiplier applied when any cache exists
pub const CACHE_LATENCY_FACTOR: f64 = 0.6;

/// Utilization at which errors start to appear
pub const ERROR_RAMP_START: f64 = 0.8;

/// System-wide metrics for one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    /// Requests per second served
    pub throughput: f64,
    /// Median latency in milliseconds
    pub latency_p50_ms: f64,
    /// 95th percentile latency
    pub latency_p95_ms: f64,
    /// 99th percentile latency
    pub latency_p99_ms: f64,
    /// Availability in `[0, 0.99999]`
    pub availability: f64,
    /// Error probability in `[0, 1]`
    pub error_rate: f64,
    /// Hops along the critical path
    pub network_hops: usize,
    /// Most relaxed consistency among storage nodes
    pub consistency_model: Option<ConsistencyModel>,
    /// Cache hit rate when caches exist
    pub cache_hit_rate: Option<f64>,
    /// Read share of database traffic when databases exist
    pub db_read_write_ratio: Option<f64>,
    /// Scalability score in `[0, 100]`
    pub scalability_score: f64,
    /// Monthly infrastructure cost
    pub monthly_cost: f64,
    /// Backlog proxy when queues exist
    pub queue_depth: Option<f64>,
    /// Union of storage CAP alignments
    pub cap_state: Option<String>,
    /// AI-specific figures when AI components exist
    pub ai: Option<AiMetrics>,
}

/// Compute metrics for a graph under `traffic_load`
#[must_use]
pub fn compute_metrics(catalog: &Catalog, nodes: &[Node], edges: &[Edge], traffic_load: f64) -> MetricSnapshot {
    let view = GraphView::new(catalog, nodes, edges);
    let analysis = analyze_view(&view);
    let load = propagate_view(&view, traffic_load);
    derive_metrics(&view, &analysis, &load, traffic_load)
}

/// Compute metrics from an existing analysis and load map
#[must_use]
pub fn derive_metrics(
    view: &GraphView<'_>,
    analysis: &TopologyAnalysis,
    load: &LoadMap,
    traffic_load: f64,
) -> MetricSnapshot {
    if view.is_empty() {
        return MetricSnapshot::default();
    }
    let traffic_load = traffic_load.max(0.0);

    let throughput = throughput(view, analysis, traffic_load);
    let latency_p50_ms = latency_p50(analysis);
    let has_queues = analysis.has_queues;

    let snapshot = MetricSnapshot {
        throughput,
        latency_p50_ms,
        latency_p95_ms: latency_p50_ms * 1.4,
        latency_p99_ms: latency_p50_ms * 2.1,
        availability: availability(view, analysis),
        error_rate: path_error_rate(view, analysis, load),
        network_hops: analysis.network_hops,
        consistency_model: consistency_model(view),
        cache_hit_rate: cache_hit_rate(view),
        db_read_write_ratio: view
            .known()
            .any(|(_, p)| p.category == Category::Storage && !p.role.is_cache())
            .then_some(0.8),
        scalability_score: scalability_score(view, analysis),
        monthly_cost: view.known().map(|(n, p)| p.monthly_cost(n.replicas())).sum(),
        queue_depth: has_queues.then(|| 0.1 * (traffic_load - throughput).max(0.0)),
        cap_state: cap_state(view),
        ai: ai::ai_metrics(view, load),
    };
    tracing::debug!(
        throughput = snapshot.throughput,
        p99 = snapshot.latency_p99_ms,
        availability = snapshot.availability,
        error_rate = snapshot.error_rate,
        "metrics derived"
    );
    snapshot
}

/// Error probability of a component at a given utilization
///
/// Zero below 80%, a linear ramp up to `failure_rate_at_capacity` at 100%,
/// then growing by half the overload beyond capacity, capped at 1.
#[must_use]
pub fn error_rate_at(profile: &ComponentProfile, load_ratio: f64) -> f64 {
    let base = profile.failure_rate_at_capacity;
    if load_ratio > 1.0 {
        (base + (load_ratio - 1.0) * 0.5).min(1.0)
    } else if load_ratio > ERROR_RAMP_START {
        base * ((load_ratio - ERROR_RAMP_START) / (1.0 - ERROR_RAMP_START))
    } else {
        0.0
    }
}

/// Load divided by effective capacity, zero for unknown kinds
#[must_use]
pub fn load_ratio(view: &GraphView<'_>, node: &Node, load: &LoadMap) -> f64 {
    match view.capacity(node.id) {
        Some(capacity) if capacity > 0.0 => load.get(&node.id).copied().unwrap_or(0.0) / capacity,
        _ => 0.0,
    }
}

fn is_traffic_carrier(profile: &ComponentProfile) -> bool {
    profile.category != Category::Clients
}

fn throughput(view: &GraphView<'_>, analysis: &TopologyAnalysis, traffic_load: f64) -> f64 {
    let capacity = analysis
        .critical_path
        .iter()
        .filter(|&&id| view.profile(id).is_some_and(is_traffic_carrier))
        .filter_map(|&id| view.capacity(id))
        .fold(None, |min: Option<f64>, c| Some(min.map_or(c, |m| m.min(c))));
    match capacity {
        Some(capacity) => traffic_load.min(capacity),
        None => traffic_load,
    }
}

fn latency_p50(analysis: &TopologyAnalysis) -> f64 {
    let raw = analysis.critical_path_latency_ms + HOP_LATENCY_MS * analysis.network_hops as f64;
    if analysis.has_caches {
        raw * CACHE_LATENCY_FACTOR
    } else {
        raw
    }
}

/// Single points of failure are independent components in series
fn availability(view: &GraphView<'_>, analysis: &TopologyAnalysis) -> f64 {
    if analysis.single_points_of_failure.is_empty() {
        return AVAILABILITY_CEILING;
    }
    let serial: f64 = analysis
        .single_points_of_failure
        .iter()
        .filter_map(|&id| view.profile(id))
        .map(|p| p.availability_sla.clamp(0.0, 1.0))
        .product();
    serial.clamp(0.0, AVAILABILITY_CEILING)
}

fn path_error_rate(view: &GraphView<'_>, analysis: &TopologyAnalysis, load: &LoadMap) -> f64 {
    let mut worst: f64 = 0.0;
    for &id in &analysis.critical_path {
        let Some(node) = view.node(id) else {
            continue;
        };
        if node.state.is_manually_failed {
            return 1.0;
        }
        let Some(profile) = view.profile(id) else {
            continue;
        };
        if !is_traffic_carrier(profile) {
            continue;
        }
        worst = worst.max(error_rate_at(profile, load_ratio(view, node, load)));
    }
    worst
}

fn storage_profiles<'a>(view: &'a GraphView<'_>) -> impl Iterator<Item = &'a ComponentProfile> + 'a {
    view.known()
        .filter(|(_, p)| p.category == Category::Storage)
        .map(|(_, p)| p)
}

fn consistency_model(view: &GraphView<'_>) -> Option<ConsistencyModel> {
    storage_profiles(view)
        .map(|p| p.consistency)
        .max_by_key(|c| c.relaxation())
}

fn cap_state(view: &GraphView<'_>) -> Option<String> {
    let labels: BTreeSet<CapAlignment> = storage_profiles(view).map(|p| p.cap).collect();
    match labels.len() {
        0 => None,
        1 => labels.iter().next().map(ToString::to_string),
        _ => {
            let joined: Vec<String> = labels.iter().map(ToString::to_string).collect();
            Some(format!("{} (mixed)", joined.join(" + ")))
        }
    }
}

fn cache_hit_rate(view: &GraphView<'_>) -> Option<f64> {
    let replicas: u32 = view
        .known()
        .filter(|(_, p)| p.role == Role::Cache)
        .map(|(n, _)| n.replicas())
        .sum();
    (replicas > 0).then(|| (0.8 + 0.02 * f64::from(replicas)).min(0.95))
}

fn scalability_score(view: &GraphView<'_>, analysis: &TopologyAnalysis) -> f64 {
    let carriers: Vec<(&Node, &ComponentProfile)> =
        view.known().filter(|(_, p)| is_traffic_carrier(p)).collect();
    if carriers.is_empty() {
        return 0.0;
    }
    let count = carriers.len() as f64;
    let scalable = carriers.iter().filter(|(_, p)| p.horizontally_scalable).count() as f64;
    let avg_replicas = carriers.iter().map(|(n, _)| f64::from(n.replicas())).sum::<f64>() / count;

    let mut score = 50.0;
    score += 20.0 * scalable / count;
    if carriers.iter().any(|(_, p)| p.role == Role::LoadBalancer) {
        score += 10.0;
    }
    if analysis.has_caches {
        score += 10.0;
    }
    score -= 5.0 * analysis.single_points_of_failure.len() as f64;
    score += ((avg_replicas - 1.0) * 10.0).clamp(0.0, 10.0);
    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(failure: f64) -> ComponentProfile {
        let mut p = Catalog::builtin().get("web-server").unwrap().clone();
        p.failure_rate_at_capacity = failure;
        p
    }

    #[test]
    fn error_rate_ramp() {
        let p = profile(0.1);
        assert_eq!(error_rate_at(&p, 0.5), 0.0);
        assert_eq!(error_rate_at(&p, 0.8), 0.0);
        assert!((error_rate_at(&p, 0.9) - 0.05).abs() < 1e-9);
        assert!((error_rate_at(&p, 1.0) - 0.1).abs() < 1e-9);
        assert!((error_rate_at(&p, 1.5) - 0.35).abs() < 1e-9);
        assert_eq!(error_rate_at(&p, 10.0), 1.0);
    }

    #[test]
    fn empty_graph_is_zeroed() {
        let snapshot = compute_metrics(Catalog::builtin(), &[], &[], 1000.0);
        assert_eq!(snapshot, MetricSnapshot::default());
        assert!(snapshot.cache_hit_rate.is_none());
        assert!(snapshot.ai.is_none());
    }

    #[test]
    fn failed_client_on_critical_path_forces_full_error_rate() {
        let mut store = archsim_test_utils::chain_of(&["web-client", "web-server", "postgres"]);
        let client = archsim_test_utils::id_of(&store, "n0");
        store.set_manually_failed(client, true).unwrap();
        let snapshot = compute_metrics(store.catalog(), store.nodes(), store.edges(), 100.0);
        assert_eq!(snapshot.error_rate, 1.0);
    }

    #[test]
    fn failed_unknown_kind_on_critical_path_forces_full_error_rate() {
        let mut store = archsim_test_utils::chain_of(&["web-client", "mystery-box", "postgres"]);
        let unknown = archsim_test_utils::id_of(&store, "n1");
        store.set_manually_failed(unknown, true).unwrap();
        let snapshot = compute_metrics(store.catalog(), store.nodes(), store.edges(), 100.0);
        assert_eq!(snapshot.error_rate, 1.0);
    }
}
