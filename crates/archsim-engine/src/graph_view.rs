//! Read-only graph view shared by the analysis passes
//!
//! Built once per call from borrowed node and edge slices. Edges whose
//! endpoints are missing from the node list are dropped with a warning,
//! nodes whose kind is missing from the catalog stay in the graph but
//! resolve to no profile.

use archsim_model::{Catalog, ComponentProfile, Edge, Node, NodeId};
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::{depth_first_search, DfsEvent};
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};

/// Indexed directed graph over borrowed nodes
#[derive(Debug)]
pub struct GraphView<'a> {
    catalog: &'a Catalog,
    nodes: &'a [Node],
    index: HashMap<NodeId, usize>,
    profiles: Vec<Option<&'a ComponentProfile>>,
    graph: DiGraphMap<NodeId, ()>,
}

impl<'a> GraphView<'a> {
    /// Index nodes and edges
    pub fn new(catalog: &'a Catalog, nodes: &'a [Node], edges: &[Edge]) -> Self {
        let mut graph = DiGraphMap::with_capacity(nodes.len(), edges.len());
        let mut index = HashMap::with_capacity(nodes.len());
        let mut profiles = Vec::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            graph.add_node(node.id);
            index.insert(node.id, i);
            profiles.push(catalog.profile_of(node));
        }
        for edge in edges {
            if !index.contains_key(&edge.source) || !index.contains_key(&edge.target) {
                tracing::warn!(edge = %edge.id, "edge references a missing node, skipping");
                continue;
            }
            graph.add_edge(edge.source, edge.target, ());
        }
        Self {
            catalog,
            nodes,
            index,
            profiles,
            graph,
        }
    }

    /// Catalog the view resolves kinds against
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Nodes in placement order
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &'a [Node] {
        self.nodes
    }

    /// Check if the graph has no nodes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of usable edges
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up a node
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&'a Node> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Catalog profile of a node, `None` for unknown kinds
    #[must_use]
    pub fn profile(&self, id: NodeId) -> Option<&'a ComponentProfile> {
        self.index.get(&id).and_then(|&i| self.profiles[i])
    }

    /// Nodes paired with their resolved profiles, unknown kinds skipped
    pub fn known(&self) -> impl Iterator<Item = (&'a Node, &'a ComponentProfile)> + '_ {
        self.nodes
            .iter()
            .zip(&self.profiles)
            .filter_map(|(n, p)| p.map(|p| (n, p)))
    }

    /// Effective capacity of a node, `None` for unknown kinds
    #[must_use]
    pub fn capacity(&self, id: NodeId) -> Option<f64> {
        let node = self.node(id)?;
        Some(self.profile(id)?.effective_capacity(node.replicas()))
    }

    /// Downstream neighbours in edge creation order
    pub fn successors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.neighbors_directed(id, Direction::Outgoing)
    }

    /// Upstream neighbours in edge creation order
    pub fn predecessors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.neighbors_directed(id, Direction::Incoming)
    }

    /// Number of outgoing edges
    #[must_use]
    pub fn out_degree(&self, id: NodeId) -> usize {
        self.successors(id).count()
    }

    /// Number of incoming edges
    #[must_use]
    pub fn in_degree(&self, id: NodeId) -> usize {
        self.predecessors(id).count()
    }

    /// Nodes with no incoming edge, in placement order
    #[must_use]
    pub fn sources(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .map(|n| n.id)
            .filter(|&id| self.in_degree(id) == 0)
            .collect()
    }

    /// Nodes with no outgoing edge, in placement order
    #[must_use]
    pub fn sinks(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .map(|n| n.id)
            .filter(|&id| self.out_degree(id) == 0)
            .collect()
    }

    /// Depth-first walk from every source in placement order
    ///
    /// Returns reachable nodes in finish order, so each successor reached
    /// over a tree, forward or cross edge comes before its parent, together
    /// with the back edges that close cycles.
    #[must_use]
    pub fn finish_order(&self) -> (Vec<NodeId>, HashSet<(NodeId, NodeId)>) {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut back_edges = HashSet::new();
        depth_first_search(&self.graph, self.sources(), |event| match event {
            DfsEvent::BackEdge(from, to) => {
                back_edges.insert((from, to));
            }
            DfsEvent::Finish(id, _) => order.push(id),
            _ => {}
        });
        (order, back_edges)
    }

    /// Every node reachable from any source, skipping `removed`
    ///
    /// Breadth-first from all sources at once; `removed` is treated as if it
    /// were not in the graph, including when it is a source itself.
    #[must_use]
    pub fn reachable_from_sources(&self, removed: Option<NodeId>) -> HashSet<NodeId> {
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        for source in self.sources() {
            if Some(source) != removed && seen.insert(source) {
                queue.push_back(source);
            }
        }
        while let Some(current) = queue.pop_front() {
            for next in self.successors(current) {
                if Some(next) != removed && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archsim_model::{EdgeId, NodeConfig};

    fn node(id: u64, kind: &str) -> Node {
        Node::new(NodeId(id), kind, NodeConfig::new(format!("n{id}")))
    }

    #[test]
    fn sources_and_sinks() {
        let nodes = vec![node(1, "web-client"), node(2, "web-server"), node(3, "postgres")];
        let edges = vec![
            Edge::new(EdgeId(10), NodeId(1), NodeId(2)),
            Edge::new(EdgeId(11), NodeId(2), NodeId(3)),
        ];
        let view = GraphView::new(Catalog::builtin(), &nodes, &edges);
        assert_eq!(view.sources(), vec![NodeId(1)]);
        assert_eq!(view.sinks(), vec![NodeId(3)]);
    }

    #[test]
    fn dangling_edges_are_dropped() {
        let nodes = vec![node(1, "web-client"), node(2, "web-server")];
        let edges = vec![
            Edge::new(EdgeId(10), NodeId(1), NodeId(2)),
            Edge::new(EdgeId(11), NodeId(2), NodeId(99)),
        ];
        let view = GraphView::new(Catalog::builtin(), &nodes, &edges);
        assert_eq!(view.edge_count(), 1);
        assert_eq!(view.sinks(), vec![NodeId(2)]);
    }

    #[test]
    fn unknown_kind_has_no_profile() {
        let nodes = vec![node(1, "quantum-router")];
        let view = GraphView::new(Catalog::builtin(), &nodes, &[]);
        assert!(view.profile(NodeId(1)).is_none());
        assert!(view.capacity(NodeId(1)).is_none());
        assert_eq!(view.known().count(), 0);
    }

    #[test]
    fn successors_keep_edge_order() {
        let nodes = vec![node(1, "load-balancer"), node(2, "web-server"), node(3, "web-server")];
        let edges = vec![
            Edge::new(EdgeId(10), NodeId(1), NodeId(3)),
            Edge::new(EdgeId(11), NodeId(1), NodeId(2)),
        ];
        let view = GraphView::new(Catalog::builtin(), &nodes, &edges);
        let next: Vec<NodeId> = view.successors(NodeId(1)).collect();
        assert_eq!(next, vec![NodeId(3), NodeId(2)]);
    }

    #[test]
    fn reachability_skips_removed_node() {
        let nodes = vec![node(1, "web-client"), node(2, "web-server"), node(3, "postgres")];
        let edges = vec![
            Edge::new(EdgeId(10), NodeId(1), NodeId(2)),
            Edge::new(EdgeId(11), NodeId(2), NodeId(3)),
        ];
        let view = GraphView::new(Catalog::builtin(), &nodes, &edges);
        assert_eq!(view.reachable_from_sources(None).len(), 3);
        let without_server = view.reachable_from_sources(Some(NodeId(2)));
        assert!(without_server.contains(&NodeId(1)));
        assert!(!without_server.contains(&NodeId(3)));
    }

    #[test]
    fn finish_order_puts_children_first_and_reports_back_edges() {
        let nodes = vec![node(1, "web-client"), node(2, "web-server"), node(3, "worker")];
        let edges = vec![
            Edge::new(EdgeId(10), NodeId(1), NodeId(2)),
            Edge::new(EdgeId(11), NodeId(2), NodeId(3)),
            Edge::new(EdgeId(12), NodeId(3), NodeId(2)),
        ];
        let view = GraphView::new(Catalog::builtin(), &nodes, &edges);
        let (order, back_edges) = view.finish_order();
        assert_eq!(order, vec![NodeId(3), NodeId(2), NodeId(1)]);
        assert_eq!(back_edges, HashSet::from([(NodeId(3), NodeId(2))]));
    }
}
