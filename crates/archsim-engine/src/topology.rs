//! Graph topology analysis
//!
//! Recomputed from scratch on every call:
//! - critical path: highest-latency path from a source to a leaf
//! - single points of failure: structural cut-vertex test unioned with
//!   critical-path occupancy
//! - bottleneck: lowest effective capacity on the critical path
//! - structural flags and redundancy groups

use crate::graph_view::GraphView;
use archsim_model::{Catalog, Category, Edge, Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Result of [`analyze_topology`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyAnalysis {
    /// Highest-latency source to leaf traversal
    pub critical_path: Vec<NodeId>,
    /// Summed base latency along the critical path
    pub critical_path_latency_ms: f64,
    /// Nodes whose loss takes traffic down
    pub single_points_of_failure: BTreeSet<NodeId>,
    /// Lowest-capacity node on the critical path
    pub bottleneck: Option<NodeId>,
    /// Edges traversed along the critical path
    pub network_hops: usize,
    /// Any cache present
    pub has_caches: bool,
    /// Any queue or stream present
    pub has_queues: bool,
    /// Any storage present
    pub has_storage: bool,
    /// Any client present
    pub has_clients: bool,
    /// Node ids grouped by component kind
    pub redundancy_groups: BTreeMap<String, Vec<NodeId>>,
}

impl TopologyAnalysis {
    /// Check whether a node is flagged as a single point of failure
    #[inline]
    #[must_use]
    pub fn is_spof(&self, id: NodeId) -> bool {
        self.single_points_of_failure.contains(&id)
    }

    /// Check whether a node lies on the critical path
    #[inline]
    #[must_use]
    pub fn on_critical_path(&self, id: NodeId) -> bool {
        self.critical_path.contains(&id)
    }
}

/// Analyze the structure of a graph
#[must_use]
pub fn analyze_topology(catalog: &Catalog, nodes: &[Node], edges: &[Edge]) -> TopologyAnalysis {
    let view = GraphView::new(catalog, nodes, edges);
    analyze_view(&view)
}

/// Analyze an already indexed graph
#[must_use]
pub fn analyze_view(view: &GraphView<'_>) -> TopologyAnalysis {
    if view.is_empty() {
        return TopologyAnalysis::default();
    }

    let (critical_path, critical_path_latency_ms) = critical_path(view);
    let single_points_of_failure = single_points_of_failure(view, &critical_path);
    let bottleneck = bottleneck(view, &critical_path);

    let mut analysis = TopologyAnalysis {
        network_hops: critical_path.len().saturating_sub(1),
        critical_path,
        critical_path_latency_ms,
        single_points_of_failure,
        bottleneck,
        ..TopologyAnalysis::default()
    };

    for node in view.nodes() {
        analysis
            .redundancy_groups
            .entry(node.kind.clone())
            .or_default()
            .push(node.id);
    }
    for (_, profile) in view.known() {
        analysis.has_caches |= profile.role.is_cache();
        analysis.has_queues |= profile.category == Category::Messaging;
        analysis.has_storage |= profile.category == Category::Storage;
        analysis.has_clients |= profile.category == Category::Clients;
    }

    tracing::debug!(
        path_len = analysis.critical_path.len(),
        latency_ms = analysis.critical_path_latency_ms,
        spofs = analysis.single_points_of_failure.len(),
        "topology analyzed"
    );
    analysis
}

fn latency_of(view: &GraphView<'_>, id: NodeId) -> f64 {
    view.profile(id).map_or(0.0, |p| p.base_latency_ms)
}

/// Longest accumulated-latency path from any source
///
/// Dynamic programming over the depth-first finish order, linear in nodes
/// plus edges. Back edges are ignored, so a cycle is walked at most once.
/// Equal-latency paths keep the first one in discovery order. Without
/// sources the first node stands in as a one-node path.
fn critical_path(view: &GraphView<'_>) -> (Vec<NodeId>, f64) {
    let sources = view.sources();
    if sources.is_empty() {
        let first = view.nodes()[0].id;
        return (vec![first], latency_of(view, first));
    }

    // Slowest latency from each node down to a leaf, and the next hop taken
    let (order, back_edges) = view.finish_order();
    let mut down: HashMap<NodeId, (f64, Option<NodeId>)> = HashMap::with_capacity(order.len());
    for id in order {
        let mut best: Option<(f64, NodeId)> = None;
        for next in view.successors(id) {
            if back_edges.contains(&(id, next)) {
                continue;
            }
            let Some(&(latency, _)) = down.get(&next) else {
                continue;
            };
            if best.map_or(true, |(b, _)| latency > b) {
                best = Some((latency, next));
            }
        }
        let own = latency_of(view, id);
        let entry = match best {
            Some((latency, next)) => (own + latency, Some(next)),
            None => (own, None),
        };
        down.insert(id, entry);
    }

    let mut start: Option<(f64, NodeId)> = None;
    for source in sources {
        let Some(&(latency, _)) = down.get(&source) else {
            continue;
        };
        if start.map_or(true, |(b, _)| latency > b) {
            start = Some((latency, source));
        }
    }
    let Some((_, mut current)) = start else {
        return (Vec::new(), 0.0);
    };

    let mut path = vec![current];
    let mut total = latency_of(view, current);
    while let Some(&(_, Some(next))) = down.get(&current) {
        path.push(next);
        total += latency_of(view, next);
        current = next;
    }
    (path, total)
}

/// Candidates exclude clients, observability and unknown kinds
fn is_spof_candidate(view: &GraphView<'_>, node: &Node) -> bool {
    view.profile(node.id)
        .is_some_and(|p| !p.category.is_passive())
}

fn single_points_of_failure(view: &GraphView<'_>, critical_path: &[NodeId]) -> BTreeSet<NodeId> {
    let mut spofs = BTreeSet::new();

    // Structural cut-vertex test
    let sinks = view.sinks();
    let baseline = view.reachable_from_sources(None);
    let reachable_sinks: Vec<NodeId> = sinks.into_iter().filter(|s| baseline.contains(s)).collect();
    for node in view.nodes() {
        if node.replicas() != 1 || !is_spof_candidate(view, node) {
            continue;
        }
        let after = view.reachable_from_sources(Some(node.id));
        let cuts_a_sink = reachable_sinks
            .iter()
            .any(|&sink| sink != node.id && !after.contains(&sink));
        if cuts_a_sink {
            spofs.insert(node.id);
        }
    }

    // Critical-path occupancy: unreplicated nodes carrying the dominant path
    for &id in critical_path {
        if let Some(node) = view.node(id) {
            if node.replicas() <= 1 && is_spof_candidate(view, node) {
                spofs.insert(id);
            }
        }
    }

    spofs
}

fn bottleneck(view: &GraphView<'_>, critical_path: &[NodeId]) -> Option<NodeId> {
    let mut best: Option<(NodeId, f64)> = None;
    for &id in critical_path {
        let Some(profile) = view.profile(id) else {
            continue;
        };
        if profile.category == Category::Clients {
            continue;
        }
        let Some(capacity) = view.capacity(id) else {
            continue;
        };
        if best.map_or(true, |(_, c)| capacity < c) {
            best = Some((id, capacity));
        }
    }
    best.map(|(id, _)| id)
}
