//! Load propagation
//!
//! Splits the input traffic evenly across source nodes, then walks the graph
//! breadth-first, dividing each node's accumulated load evenly across its
//! outgoing edges. Every node is expanded at most once, which bounds the walk
//! on cyclic graphs: load arriving at an already expanded node is recorded
//! but not forwarded again.

use crate::graph_view::GraphView;
use archsim_model::{Catalog, Edge, Node, NodeId};
use std::collections::{HashMap, HashSet, VecDeque};

/// Incoming load per node
pub type LoadMap = HashMap<NodeId, f64>;

/// Propagate `traffic_load` from the sources through the graph
#[must_use]
pub fn propagate_load(catalog: &Catalog, nodes: &[Node], edges: &[Edge], traffic_load: f64) -> LoadMap {
    let view = GraphView::new(catalog, nodes, edges);
    propagate_view(&view, traffic_load)
}

/// Propagate over an already indexed graph
#[must_use]
pub fn propagate_view(view: &GraphView<'_>, traffic_load: f64) -> LoadMap {
    let mut load: LoadMap = view.nodes().iter().map(|n| (n.id, 0.0)).collect();
    let sources = view.sources();
    if sources.is_empty() {
        return load;
    }

    let per_source = traffic_load.max(0.0) / sources.len() as f64;
    let mut queued: HashSet<NodeId> = HashSet::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    for source in sources {
        load.insert(source, per_source);
        queued.insert(source);
        queue.push_back(source);
    }

    while let Some(current) = queue.pop_front() {
        let targets: Vec<NodeId> = view.successors(current).collect();
        if targets.is_empty() {
            continue;
        }
        let share = load.get(&current).copied().unwrap_or(0.0) / targets.len() as f64;
        for target in targets {
            *load.entry(target).or_insert(0.0) += share;
            if queued.insert(target) {
                queue.push_back(target);
            }
        }
    }

    load
}

#[cfg(test)]
mod tests {
    use super::*;
    use archsim_model::{EdgeId, NodeConfig};

    fn node(id: u64, kind: &str) -> Node {
        Node::new(NodeId(id), kind, NodeConfig::new(format!("n{id}")))
    }

    fn edge(id: u64, from: u64, to: u64) -> Edge {
        Edge::new(EdgeId(id), NodeId(from), NodeId(to))
    }

    #[test]
    fn chain_conserves_load() {
        let nodes = vec![node(1, "web-client"), node(2, "web-server"), node(3, "postgres")];
        let edges = vec![edge(10, 1, 2), edge(11, 2, 3)];
        let load = propagate_load(Catalog::builtin(), &nodes, &edges, 1000.0);
        assert_eq!(load[&NodeId(1)], 1000.0);
        assert_eq!(load[&NodeId(2)], 1000.0);
        assert_eq!(load[&NodeId(3)], 1000.0);
    }

    #[test]
    fn fan_out_splits_evenly() {
        let nodes = vec![node(1, "load-balancer"), node(2, "web-server"), node(3, "web-server")];
        let edges = vec![edge(10, 1, 2), edge(11, 1, 3)];
        let load = propagate_load(Catalog::builtin(), &nodes, &edges, 1000.0);
        assert_eq!(load[&NodeId(2)], 500.0);
        assert_eq!(load[&NodeId(3)], 500.0);
    }

    #[test]
    fn multiple_sources_share_traffic() {
        let nodes = vec![node(1, "web-client"), node(2, "mobile-client"), node(3, "web-server")];
        let edges = vec![edge(10, 1, 3), edge(11, 2, 3)];
        let load = propagate_load(Catalog::builtin(), &nodes, &edges, 1000.0);
        assert_eq!(load[&NodeId(1)], 500.0);
        assert_eq!(load[&NodeId(2)], 500.0);
        assert_eq!(load[&NodeId(3)], 1000.0);
    }

    #[test]
    fn diamond_merges_before_expanding() {
        let nodes = vec![
            node(1, "load-balancer"),
            node(2, "web-server"),
            node(3, "web-server"),
            node(4, "postgres"),
        ];
        let edges = vec![edge(10, 1, 2), edge(11, 1, 3), edge(12, 2, 4), edge(13, 3, 4)];
        let load = propagate_load(Catalog::builtin(), &nodes, &edges, 800.0);
        assert_eq!(load[&NodeId(4)], 800.0);
    }

    #[test]
    fn unreached_nodes_get_zero() {
        let nodes = vec![node(1, "web-client"), node(2, "web-server"), node(3, "worker"), node(4, "redis")];
        // 3 <-> 4 is an island with no source
        let edges = vec![edge(10, 1, 2), edge(11, 3, 4), edge(12, 4, 3)];
        let load = propagate_load(Catalog::builtin(), &nodes, &edges, 100.0);
        assert_eq!(load[&NodeId(3)], 0.0);
        assert_eq!(load[&NodeId(4)], 0.0);
    }

    #[test]
    fn feedback_edge_is_not_reexpanded() {
        let nodes = vec![node(1, "web-client"), node(2, "web-server"), node(3, "worker")];
        let edges = vec![edge(10, 1, 2), edge(11, 2, 3), edge(12, 3, 2)];
        let load = propagate_load(Catalog::builtin(), &nodes, &edges, 100.0);
        assert_eq!(load[&NodeId(2)], 200.0);
        assert_eq!(load[&NodeId(3)], 100.0);
    }

    #[test]
    fn no_sources_means_no_load() {
        let nodes = vec![node(1, "web-server"), node(2, "postgres")];
        let edges = vec![edge(10, 1, 2), edge(11, 2, 1)];
        let load = propagate_load(Catalog::builtin(), &nodes, &edges, 100.0);
        assert!(load.values().all(|&l| l == 0.0));
    }

    #[test]
    fn empty_graph_is_empty_map() {
        assert!(propagate_load(Catalog::builtin(), &[], &[], 100.0).is_empty());
    }
}
