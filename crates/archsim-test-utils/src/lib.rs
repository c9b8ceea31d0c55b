//! Testing utilities for the archsim workspace
//!
//! Reference architectures and a label-addressed graph builder.

#![allow(missing_docs)]

use archsim_model::{GraphStore, NodeConfig, NodeId, Scenario};
use std::collections::HashMap;

/// Builds a [`GraphStore`] addressing nodes by label
#[derive(Debug, Default)]
pub struct GraphBuilder {
    store: GraphStore,
    ids: HashMap<String, NodeId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(self, kind: &str, label: &str) -> Self {
        self.replicated(kind, label, 1)
    }

    pub fn replicated(mut self, kind: &str, label: &str, replicas: u32) -> Self {
        let id = self
            .store
            .add_node_with(kind, NodeConfig::new(label).with_replicas(replicas))
            .unwrap();
        self.ids.insert(label.to_string(), id);
        self
    }

    pub fn in_region(mut self, kind: &str, label: &str, region: &str) -> Self {
        let id = self
            .store
            .add_node_with(kind, NodeConfig::new(label).with_region(region))
            .unwrap();
        self.ids.insert(label.to_string(), id);
        self
    }

    pub fn edge(mut self, from: &str, to: &str) -> Self {
        let source = self.ids[from];
        let target = self.ids[to];
        self.store.connect(source, target).unwrap();
        self
    }

    /// Connect labels in sequence
    pub fn chain(mut self, labels: &[&str]) -> Self {
        for pair in labels.windows(2) {
            self = self.edge(pair[0], pair[1]);
        }
        self
    }

    pub fn id(&self, label: &str) -> NodeId {
        self.ids[label]
    }

    pub fn build(self) -> GraphStore {
        self.store
    }

    pub fn build_with_ids(self) -> (GraphStore, HashMap<String, NodeId>) {
        (self.store, self.ids)
    }
}

/// Look up a node id by label
pub fn id_of(store: &GraphStore, label: &str) -> NodeId {
    store
        .nodes()
        .iter()
        .find(|n| n.label() == label)
        .map(|n| n.id)
        .unwrap_or_else(|| panic!("no node labelled {label}"))
}

/// Client -> Server -> Postgres
pub fn basic_web_app() -> GraphStore {
    GraphBuilder::new()
        .node("web-client", "Client")
        .node("web-server", "Server")
        .node("postgres", "Postgres")
        .chain(&["Client", "Server", "Postgres"])
        .build()
}

/// Client -> LB -> Server x2 -> Postgres
pub fn balanced_web_app() -> GraphStore {
    GraphBuilder::new()
        .node("web-client", "Client")
        .node("load-balancer", "LB")
        .replicated("web-server", "Server", 2)
        .node("postgres", "Postgres")
        .chain(&["Client", "LB", "Server", "Postgres"])
        .build()
}

/// A production-minded web stack with cache, queue, replicas and observability
pub fn production_web_app() -> GraphStore {
    GraphBuilder::new()
        .node("web-client", "Client")
        .replicated("cdn", "CDN", 2)
        .replicated("firewall", "WAF", 2)
        .replicated("load-balancer", "LB", 2)
        .replicated("api-gateway", "Gateway", 2)
        .replicated("auth-service", "Auth", 2)
        .replicated("web-server", "Server", 3)
        .replicated("redis", "Cache", 2)
        .replicated("postgres", "Postgres", 2)
        .replicated("message-queue", "Queue", 2)
        .replicated("worker", "Worker", 2)
        .replicated("object-storage", "Backups", 2)
        .node("monitoring", "Metrics")
        .node("logging", "Logs")
        .node("tracing", "Traces")
        .chain(&["Client", "CDN", "WAF", "LB", "Gateway", "Server", "Postgres"])
        .edge("Gateway", "Auth")
        .edge("Server", "Cache")
        .edge("Server", "Queue")
        .edge("Queue", "Worker")
        .edge("Worker", "Postgres")
        .edge("Postgres", "Backups")
        .build()
}

/// Client -> Server -> LLM with retrieval
pub fn ai_assistant() -> GraphStore {
    GraphBuilder::new()
        .node("web-client", "Client")
        .node("app-server", "App")
        .node("vector-db", "Vectors")
        .node("llm-api", "LLM")
        .node("postgres", "Postgres")
        .chain(&["Client", "App", "LLM"])
        .edge("App", "Vectors")
        .edge("App", "Postgres")
        .build()
}

/// Simple chain of kinds, labelled `n0`, `n1`, ...
pub fn chain_of(kinds: &[&str]) -> GraphStore {
    let mut builder = GraphBuilder::new();
    let labels: Vec<String> = (0..kinds.len()).map(|i| format!("n{i}")).collect();
    for (kind, label) in kinds.iter().zip(&labels) {
        builder = builder.node(kind, label);
    }
    let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    builder.chain(&refs).build()
}

pub fn basic_web_app_scenario() -> Scenario {
    Scenario::new("basic-web-app").with_required_kinds(["web-client", "web-server", "postgres"])
}
