//! Graph model: placed components and the links between them
//!
//! [`GraphStore`] is the single owner of nodes and edges. The editor layer
//! mutates configuration through it; the simulation tick writes derived
//! health state back through [`GraphStore::apply_updates`]. Analysis code
//! only ever sees borrowed slices.

use crate::catalog::{Catalog, Category};
use crate::error::{ModelError, Result};
use crate::ids::{EdgeId, IdGenerator, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Health classification of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthStatus {
    /// Load below 80% of capacity
    #[default]
    Healthy,
    /// Load between 80% and 100% of capacity
    Warning,
    /// Load above capacity
    Critical,
    /// Manually failed
    Failed,
}

/// User-editable node settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Display label
    pub label: String,
    /// Instance count, at least 1
    pub replicas: u32,
    /// Deployment region
    pub region: String,
    /// Kind-specific overrides layered on the catalog defaults
    #[serde(default)]
    pub overrides: BTreeMap<String, serde_json::Value>,
}

impl NodeConfig {
    /// Default region for new placements
    pub const DEFAULT_REGION: &'static str = "us-east-1";

    /// Create a config with one replica in the default region
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            replicas: 1,
            region: Self::DEFAULT_REGION.to_string(),
            overrides: BTreeMap::new(),
        }
    }

    /// With replica count
    #[inline]
    #[must_use]
    pub fn with_replicas(mut self, replicas: u32) -> Self {
        self.replicas = replicas;
        self
    }

    /// With region
    #[inline]
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// With a single override value
    #[must_use]
    pub fn with_override(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.overrides.insert(key.into(), value);
        self
    }
}

/// Derived simulation state, rewritten every tick
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeSimState {
    /// Incoming load divided by effective capacity
    pub load_ratio: f64,
    /// Requests per second actually served
    pub throughput: f64,
    /// Error probability
    pub error_rate: f64,
    /// Health classification
    pub health: HealthStatus,
    /// Flagged as a single point of failure
    pub is_spof: bool,
    /// Flagged as a bottleneck
    pub is_bottleneck: bool,
    /// Failure injected from outside, honored regardless of load
    pub is_manually_failed: bool,
}

/// One placed component instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Identifier
    pub id: NodeId,
    /// Catalog kind identifier
    pub kind: String,
    /// User settings
    pub config: NodeConfig,
    /// Simulation state
    #[serde(default)]
    pub state: NodeSimState,
}

impl Node {
    /// Create a healthy single-replica node
    #[must_use]
    pub fn new(id: NodeId, kind: impl Into<String>, config: NodeConfig) -> Self {
        Self {
            id,
            kind: kind.into(),
            config,
            state: NodeSimState::default(),
        }
    }

    /// Replica count, never below 1
    #[inline]
    #[must_use]
    pub fn replicas(&self) -> u32 {
        self.config.replicas.max(1)
    }

    /// Display label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.config.label
    }

    /// Kind-specific setting: node override first, then catalog default
    #[must_use]
    pub fn setting<'a>(&'a self, catalog: &'a Catalog, key: &str) -> Option<&'a serde_json::Value> {
        self.config
            .overrides
            .get(key)
            .or_else(|| catalog.get(&self.kind)?.default_config.get(key))
    }
}

/// Directed link between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Identifier
    pub id: EdgeId,
    /// Upstream node
    pub source: NodeId,
    /// Downstream node
    pub target: NodeId,
    /// Either endpoint is an AI component
    #[serde(default)]
    pub is_ai_path: bool,
}

impl Edge {
    /// Create an edge with the AI flag unset
    #[must_use]
    pub fn new(id: EdgeId, source: NodeId, target: NodeId) -> Self {
        Self {
            id,
            source,
            target,
            is_ai_path: false,
        }
    }
}

/// Health and load values for one node, produced by the tick driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeUpdate {
    /// Target node
    pub node_id: NodeId,
    /// Load ratio
    pub load_ratio: f64,
    /// Served throughput
    pub throughput: f64,
    /// Error rate
    pub error_rate: f64,
    /// Health
    pub health: HealthStatus,
    /// Single point of failure flag
    pub is_spof: bool,
    /// Bottleneck flag
    pub is_bottleneck: bool,
}

/// Serializable snapshot of a graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Nodes
    pub nodes: Vec<Node>,
    /// Edges
    pub edges: Vec<Edge>,
}

/// Owner of the node/edge set and its id sequence
#[derive(Debug, Clone)]
pub struct GraphStore {
    catalog: Catalog,
    ids: IdGenerator,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphStore {
    /// Create an empty store backed by the built-in catalog
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(Catalog::builtin().clone())
    }

    /// Create an empty store backed by a custom catalog
    #[must_use]
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            catalog,
            ids: IdGenerator::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Rebuild a store from a document, continuing the id sequence
    #[must_use]
    pub fn from_document(catalog: Catalog, document: GraphDocument) -> Self {
        let mut ids = IdGenerator::new();
        for node in &document.nodes {
            ids.observe(node.id.0);
        }
        for edge in &document.edges {
            ids.observe(edge.id.0);
        }
        let mut store = Self {
            catalog,
            ids,
            nodes: document.nodes,
            edges: document.edges,
        };
        store.refresh_ai_paths();
        store
    }

    /// Snapshot the graph
    #[must_use]
    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Catalog used for AI path classification
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// All nodes in placement order
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges in creation order
    #[inline]
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up a node
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Place a component with default settings
    pub fn add_node(&mut self, kind: impl Into<String>, label: impl Into<String>) -> NodeId {
        let kind = kind.into();
        let config = NodeConfig::new(label);
        self.insert_node(kind, config)
    }

    /// Place a component with explicit settings
    pub fn add_node_with(&mut self, kind: impl Into<String>, config: NodeConfig) -> Result<NodeId> {
        if config.replicas == 0 {
            return Err(ModelError::InvalidReplicaCount(0));
        }
        Ok(self.insert_node(kind.into(), config))
    }

    fn insert_node(&mut self, kind: String, config: NodeConfig) -> NodeId {
        if !self.catalog.contains(&kind) {
            tracing::warn!(kind = %kind, "placing component with unknown kind");
        }
        let id = self.ids.next_node();
        self.nodes.push(Node::new(id, kind, config));
        id
    }

    /// Remove a node and every edge touching it
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or(ModelError::NodeNotFound(id))?;
        let node = self.nodes.remove(index);
        let before = self.edges.len();
        self.edges.retain(|e| e.source != id && e.target != id);
        tracing::debug!(node = %id, removed_edges = before - self.edges.len(), "removed node");
        Ok(node)
    }

    /// Connect two nodes
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> Result<EdgeId> {
        if source == target {
            return Err(ModelError::SelfLoop(source));
        }
        for id in [source, target] {
            if self.node(id).is_none() {
                return Err(ModelError::NodeNotFound(id));
            }
        }
        if self
            .edges
            .iter()
            .any(|e| e.source == source && e.target == target)
        {
            return Err(ModelError::DuplicateEdge {
                source_id: source,
                target_id: target,
            });
        }
        let id = self.ids.next_edge();
        let mut edge = Edge::new(id, source, target);
        edge.is_ai_path = self.touches_ai(source) || self.touches_ai(target);
        self.edges.push(edge);
        Ok(id)
    }

    /// Remove an edge
    pub fn disconnect(&mut self, id: EdgeId) -> Result<Edge> {
        let index = self
            .edges
            .iter()
            .position(|e| e.id == id)
            .ok_or(ModelError::EdgeNotFound(id))?;
        Ok(self.edges.remove(index))
    }

    /// Add one replica and return the new count
    pub fn add_replica(&mut self, id: NodeId) -> Result<u32> {
        let node = self.node_mut(id)?;
        node.config.replicas = node.replicas() + 1;
        Ok(node.config.replicas)
    }

    /// Set the replica count
    pub fn set_replicas(&mut self, id: NodeId, replicas: u32) -> Result<()> {
        if replicas == 0 {
            return Err(ModelError::InvalidReplicaCount(replicas));
        }
        self.node_mut(id)?.config.replicas = replicas;
        Ok(())
    }

    /// Move a node to another region
    pub fn set_region(&mut self, id: NodeId, region: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.config.region = region.into();
        Ok(())
    }

    /// Rename a node
    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.config.label = label.into();
        Ok(())
    }

    /// Set or clear the injected failure flag
    pub fn set_manually_failed(&mut self, id: NodeId, failed: bool) -> Result<()> {
        let node = self.node_mut(id)?;
        node.state.is_manually_failed = failed;
        if failed {
            node.state.health = HealthStatus::Failed;
        }
        Ok(())
    }

    /// Write derived simulation state back onto the nodes
    ///
    /// Updates for ids that no longer exist are ignored; the graph may have
    /// been edited between the tick and the write.
    pub fn apply_updates<'a>(&mut self, updates: impl IntoIterator<Item = &'a NodeUpdate>) {
        for update in updates {
            let Some(node) = self.nodes.iter_mut().find(|n| n.id == update.node_id) else {
                continue;
            };
            let state = &mut node.state;
            state.load_ratio = update.load_ratio;
            state.throughput = update.throughput;
            state.error_rate = update.error_rate;
            state.health = update.health;
            state.is_spof = update.is_spof;
            state.is_bottleneck = update.is_bottleneck;
        }
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(ModelError::NodeNotFound(id))
    }

    fn touches_ai(&self, id: NodeId) -> bool {
        self.node(id)
            .and_then(|n| self.catalog.get(&n.kind))
            .is_some_and(|p| p.category == Category::Ai)
    }

    fn refresh_ai_paths(&mut self) {
        let flags: Vec<bool> = self
            .edges
            .iter()
            .map(|e| self.touches_ai(e.source) || self.touches_ai(e.target))
            .collect();
        for (edge, flag) in self.edges.iter_mut().zip(flags) {
            edge.is_ai_path = flag;
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
