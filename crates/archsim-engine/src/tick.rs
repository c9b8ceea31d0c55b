//! Simulation tick
//!
//! One tick is a read phase over a consistent snapshot of the graph followed
//! by a list of [`NodeUpdate`]s the caller applies in its write phase. The
//! tick itself mutates nothing.

use crate::graph_view::GraphView;
use crate::metrics::{derive_metrics, error_rate_at, load_ratio, MetricSnapshot};
use crate::propagation::propagate_view;
use crate::topology::analyze_view;
use archsim_model::{Catalog, Edge, HealthStatus, Node, NodeId, NodeUpdate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Load ratio above which a node reports a warning
pub const WARNING_LOAD: f64 = 0.8;

/// Load ratio above which a node reports critical
pub const CRITICAL_LOAD: f64 = 1.0;

/// Default load ratio above which a capacity alert is raised
pub const ALERT_LOAD: f64 = 0.9;

/// Cause of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertKind {
    /// Node became a single point of failure
    SinglePointOfFailure,
    /// Node crossed 90% of its capacity
    HighLoad,
}

/// Message raised by a tick, deduplicated by text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Alert {
    /// Why it fired
    pub kind: AlertKind,
    /// Node concerned
    pub node_id: NodeId,
    /// Human readable text, the deduplication key
    pub message: String,
}

impl Alert {
    fn single_point_of_failure(node: &Node) -> Self {
        Self {
            kind: AlertKind::SinglePointOfFailure,
            node_id: node.id,
            message: format!("{} is a single point of failure", node.label()),
        }
    }

    fn high_load(node: &Node, threshold: f64) -> Self {
        Self {
            kind: AlertKind::HighLoad,
            node_id: node.id,
            message: format!("{} is above {:.0}% capacity", node.label(), threshold * 100.0),
        }
    }
}

/// Everything one tick produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickOutcome {
    /// System-wide metrics
    pub metrics: MetricSnapshot,
    /// Per-node state for the write phase, in node order
    pub node_updates: Vec<NodeUpdate>,
    /// Alerts not present in the previous log
    pub alerts: Vec<Alert>,
    /// Topology bottleneck plus overloaded nodes
    pub bottleneck_ids: Vec<NodeId>,
    /// Single points of failure
    pub spof_ids: Vec<NodeId>,
}

/// Health for a load ratio, failed when manually failed
#[must_use]
pub fn health_for(load_ratio: f64, manually_failed: bool) -> HealthStatus {
    if manually_failed {
        HealthStatus::Failed
    } else if load_ratio > CRITICAL_LOAD {
        HealthStatus::Critical
    } else if load_ratio > WARNING_LOAD {
        HealthStatus::Warning
    } else {
        HealthStatus::Healthy
    }
}

/// Advance the simulation by one tick
#[must_use]
pub fn tick(
    catalog: &Catalog,
    nodes: &[Node],
    edges: &[Edge],
    traffic_load: f64,
    previous_alerts: &[Alert],
) -> TickOutcome {
    tick_with_alert_threshold(catalog, nodes, edges, traffic_load, previous_alerts, ALERT_LOAD)
}

/// Advance one tick, raising capacity alerts above `alert_threshold`
#[must_use]
pub fn tick_with_alert_threshold(
    catalog: &Catalog,
    nodes: &[Node],
    edges: &[Edge],
    traffic_load: f64,
    previous_alerts: &[Alert],
    alert_threshold: f64,
) -> TickOutcome {
    let view = GraphView::new(catalog, nodes, edges);
    let analysis = analyze_view(&view);
    let load = propagate_view(&view, traffic_load);
    let metrics = derive_metrics(&view, &analysis, &load, traffic_load);

    let previous: HashSet<&str> = previous_alerts.iter().map(|a| a.message.as_str()).collect();
    let mut alerts: Vec<Alert> = Vec::new();

    let mut bottlenecks: BTreeSet<NodeId> = analysis.bottleneck.into_iter().collect();
    let mut node_updates = Vec::with_capacity(nodes.len());
    for node in view.nodes() {
        let failed = node.state.is_manually_failed;
        let ratio = load_ratio(&view, node, &load);
        let (error_rate, throughput) = match view.profile(node.id) {
            _ if failed => (1.0, 0.0),
            Some(profile) => {
                let capacity = profile.effective_capacity(node.replicas());
                let incoming = load.get(&node.id).copied().unwrap_or(0.0);
                (error_rate_at(profile, ratio), incoming.min(capacity))
            }
            None => (0.0, 0.0),
        };
        let is_spof = analysis.is_spof(node.id);
        if ratio > CRITICAL_LOAD {
            bottlenecks.insert(node.id);
        }

        if is_spof {
            alerts.push(Alert::single_point_of_failure(node));
        }
        if ratio > alert_threshold {
            alerts.push(Alert::high_load(node, alert_threshold));
        }

        node_updates.push(NodeUpdate {
            node_id: node.id,
            load_ratio: ratio,
            throughput,
            error_rate,
            health: health_for(ratio, failed),
            is_spof,
            is_bottleneck: bottlenecks.contains(&node.id),
        });
    }

    // Labels may repeat across nodes
    let mut emitted: HashSet<String> = HashSet::new();
    alerts.retain(|a| !previous.contains(a.message.as_str()) && emitted.insert(a.message.clone()));
    for alert in &alerts {
        tracing::info!(node = %alert.node_id, kind = ?alert.kind, "{}", alert.message);
    }

    let bottleneck_ids: Vec<NodeId> = view
        .nodes()
        .iter()
        .map(|n| n.id)
        .filter(|id| bottlenecks.contains(id))
        .collect();

    TickOutcome {
        metrics,
        node_updates,
        alerts,
        bottleneck_ids,
        spof_ids: analysis.single_points_of_failure.iter().copied().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archsim_test_utils::{balanced_web_app, basic_web_app, id_of};

    #[test]
    fn health_thresholds() {
        assert_eq!(health_for(0.5, false), HealthStatus::Healthy);
        assert_eq!(health_for(0.8, false), HealthStatus::Healthy);
        assert_eq!(health_for(0.85, false), HealthStatus::Warning);
        assert_eq!(health_for(1.0, false), HealthStatus::Warning);
        assert_eq!(health_for(1.2, false), HealthStatus::Critical);
        assert_eq!(health_for(0.0, true), HealthStatus::Failed);
    }

    #[test]
    fn spof_alerts_are_not_repeated() {
        let store = basic_web_app();
        let first = tick(store.catalog(), store.nodes(), store.edges(), 100.0, &[]);
        assert_eq!(first.alerts.len(), 2);
        assert!(first
            .alerts
            .iter()
            .any(|a| a.message == "Server is a single point of failure"));

        let second = tick(store.catalog(), store.nodes(), store.edges(), 100.0, &first.alerts);
        assert!(second.alerts.is_empty());
    }

    #[test]
    fn overload_raises_capacity_alert_and_bottleneck() {
        let store = basic_web_app();
        let server = id_of(&store, "Server");
        // web-server capacity 2000
        let outcome = tick(store.catalog(), store.nodes(), store.edges(), 2500.0, &[]);
        assert!(outcome
            .alerts
            .iter()
            .any(|a| a.kind == AlertKind::HighLoad && a.node_id == server));
        assert!(outcome.bottleneck_ids.contains(&server));

        let update = outcome.node_updates.iter().find(|u| u.node_id == server).unwrap();
        assert_eq!(update.health, HealthStatus::Critical);
        assert_eq!(update.throughput, 2000.0);
        assert!(update.error_rate > 0.05);
    }

    #[test]
    fn manual_failure_overrides_load() {
        let mut store = balanced_web_app();
        let server = id_of(&store, "Server");
        store.set_manually_failed(server, true).unwrap();
        let outcome = tick(store.catalog(), store.nodes(), store.edges(), 10.0, &[]);
        let update = outcome.node_updates.iter().find(|u| u.node_id == server).unwrap();
        assert_eq!(update.health, HealthStatus::Failed);
        assert_eq!(update.error_rate, 1.0);
        assert_eq!(outcome.metrics.error_rate, 1.0);
    }

    #[test]
    fn empty_graph_ticks_quietly() {
        let outcome = tick(Catalog::builtin(), &[], &[], 100.0, &[]);
        assert!(outcome.node_updates.is_empty());
        assert!(outcome.alerts.is_empty());
        assert_eq!(outcome.metrics, MetricSnapshot::default());
    }
}
