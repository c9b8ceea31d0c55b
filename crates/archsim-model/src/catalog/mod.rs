//! Component catalog
//!
//! Static registry mapping a component kind identifier to its performance,
//! reliability and cost profile. The catalog is shared read-only by every
//! analysis pass; nodes refer to entries by kind string and the two may
//! drift apart, so lookups are fallible.

mod builtin;

use crate::error::Result;
use crate::graph::Node;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Broad component family
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Traffic originators (browsers, mobile apps)
    Clients,
    /// Load balancers, gateways, CDNs
    LoadBalancing,
    /// Servers, services, functions, workers
    Compute,
    /// Databases, caches, object and search stores
    Storage,
    /// Queues and streams
    Messaging,
    /// Monitoring, logging, tracing
    Observability,
    /// DNS, firewalls, auth, rate limiting
    Network,
    /// LLMs, vector stores, ML-ops
    Ai,
}

impl Category {
    /// Clients and observability never carry request traffic themselves
    #[inline]
    #[must_use]
    pub fn is_passive(self) -> bool {
        matches!(self, Self::Clients | Self::Observability)
    }
}

/// Consistency guarantee of a storage component
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsistencyModel {
    /// Linearizable reads
    Strong,
    /// Causally ordered reads
    Causal,
    /// Replicas converge eventually
    Eventual,
}

impl ConsistencyModel {
    /// Higher is more relaxed: eventual > causal > strong
    #[inline]
    #[must_use]
    pub fn relaxation(self) -> u8 {
        match self {
            Self::Strong => 0,
            Self::Causal => 1,
            Self::Eventual => 2,
        }
    }
}

impl std::fmt::Display for ConsistencyModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Strong => "strong",
            Self::Causal => "causal",
            Self::Eventual => "eventual",
        };
        f.write_str(name)
    }
}

/// CAP theorem alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CapAlignment {
    /// Consistency + partition tolerance
    CP,
    /// Availability + partition tolerance
    AP,
    /// Consistency + availability
    CA,
}

impl std::fmt::Display for CapAlignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CP => "CP",
            Self::AP => "AP",
            Self::CA => "CA",
        };
        f.write_str(name)
    }
}

/// Functional role of a component kind
///
/// Analyzers and validation checks match on roles rather than kind strings,
/// so a custom catalog entry participates in every rule its role implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum Role {
    Client,
    LoadBalancer,
    ApiGateway,
    Cdn,
    Compute,
    Serverless,
    Worker,
    Database,
    WideColumnDatabase,
    Cache,
    ObjectStore,
    Search,
    Warehouse,
    Queue,
    Stream,
    Monitoring,
    Logging,
    Tracing,
    Alerting,
    Dns,
    Firewall,
    Auth,
    RateLimiter,
    Llm,
    GpuInference,
    VectorDb,
    Embedding,
    RagPipeline,
    Agent,
    Guardrails,
    SemanticCache,
    Evaluator,
    ModelRegistry,
    TrainingCluster,
    FeatureStore,
    DriftDetector,
    AbTestController,
}

impl Role {
    /// Key-value caches
    #[inline]
    #[must_use]
    pub fn is_cache(self) -> bool {
        matches!(self, Self::Cache)
    }

    /// Databases of any model
    #[inline]
    #[must_use]
    pub fn is_database(self) -> bool {
        matches!(self, Self::Database | Self::WideColumnDatabase)
    }

    /// Queues and streams
    #[inline]
    #[must_use]
    pub fn is_queue(self) -> bool {
        matches!(self, Self::Queue | Self::Stream)
    }

    /// Model inference endpoints
    #[inline]
    #[must_use]
    pub fn is_inference(self) -> bool {
        matches!(self, Self::Llm | Self::GpuInference)
    }

    /// Model lifecycle tooling
    #[inline]
    #[must_use]
    pub fn is_ml_ops(self) -> bool {
        matches!(
            self,
            Self::ModelRegistry
                | Self::TrainingCluster
                | Self::FeatureStore
                | Self::DriftDetector
                | Self::AbTestController
        )
    }

    /// AI building blocks beyond a bare model call
    #[inline]
    #[must_use]
    pub fn is_advanced_ai(self) -> bool {
        matches!(
            self,
            Self::VectorDb
                | Self::RagPipeline
                | Self::Agent
                | Self::Guardrails
                | Self::SemanticCache
                | Self::Evaluator
        )
    }

    /// Retrieval grounding for model calls
    #[inline]
    #[must_use]
    pub fn is_retrieval(self) -> bool {
        matches!(self, Self::VectorDb | Self::RagPipeline)
    }

    /// Traffic entry components that shield the backend
    #[inline]
    #[must_use]
    pub fn is_edge_protection(self) -> bool {
        matches!(
            self,
            Self::LoadBalancer | Self::ApiGateway | Self::Cdn | Self::Firewall | Self::RateLimiter
        )
    }
}

/// Immutable profile of one component kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentProfile {
    /// Component family
    pub category: Category,
    /// Functional role
    pub role: Role,
    /// Human readable name
    #[serde(default)]
    pub display_name: String,
    /// Capacity units per second for a single instance
    pub max_throughput: f64,
    /// Milliseconds contributed when traversed
    pub base_latency_ms: f64,
    /// Error probability once load exceeds capacity
    pub failure_rate_at_capacity: f64,
    /// Whether adding replicas is a valid redundancy strategy
    pub horizontally_scalable: bool,
    /// Availability SLA in `[0, 1]`
    pub availability_sla: f64,
    /// Consistency guarantee
    pub consistency: ConsistencyModel,
    /// CAP alignment
    pub cap: CapAlignment,
    /// Monthly cost of one instance
    pub cost_per_instance_month: f64,
    /// Kind-specific default settings
    #[serde(default)]
    pub default_config: BTreeMap<String, serde_json::Value>,
}

impl ComponentProfile {
    /// Capacity of `replicas` instances
    #[inline]
    #[must_use]
    pub fn effective_capacity(&self, replicas: u32) -> f64 {
        self.max_throughput * f64::from(replicas.max(1))
    }

    /// Monthly cost of `replicas` instances
    #[inline]
    #[must_use]
    pub fn monthly_cost(&self, replicas: u32) -> f64 {
        self.cost_per_instance_month * f64::from(replicas.max(1))
    }
}

static BUILTIN: Lazy<Catalog> = Lazy::new(builtin::catalog);

/// Registry of component kinds keyed by kind identifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    kinds: BTreeMap<String, ComponentProfile>,
}

/// TOML document accepted by [`Catalog::extend_from_toml`]
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    kinds: BTreeMap<String, ComponentProfile>,
}

impl Catalog {
    /// Create an empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared built-in catalog
    #[must_use]
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Look up a kind
    #[inline]
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&ComponentProfile> {
        self.kinds.get(kind)
    }

    /// Look up the profile of a node, logging when the kind is unknown
    ///
    /// Unknown kinds are skipped by every aggregate: the node contributes no
    /// capacity, latency or cost.
    pub fn profile_of(&self, node: &Node) -> Option<&ComponentProfile> {
        let profile = self.kinds.get(&node.kind);
        if profile.is_none() {
            tracing::warn!(node = %node.id, kind = %node.kind, "unknown component kind, skipping");
        }
        profile
    }

    /// Check whether a kind is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Register or replace a kind
    pub fn insert(&mut self, kind: impl Into<String>, profile: ComponentProfile) {
        self.kinds.insert(kind.into(), profile);
    }

    /// Iterate over kinds in identifier order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ComponentProfile)> {
        self.kinds.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Kinds belonging to a category
    #[must_use]
    pub fn kinds_in(&self, category: Category) -> Vec<&str> {
        self.iter()
            .filter(|(_, p)| p.category == category)
            .map(|(k, _)| k)
            .collect()
    }

    /// Number of registered kinds
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Check if the catalog is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Merge kinds from a TOML document
    ///
    /// ```toml
    /// [kinds.tidb]
    /// category = "storage"
    /// role = "database"
    /// max_throughput = 12000.0
    /// # ...
    /// ```
    ///
    /// Returns the number of kinds added or replaced.
    pub fn extend_from_toml(&mut self, source: &str) -> Result<usize> {
        let document: CatalogDocument = toml::from_str(source)?;
        let count = document.kinds.len();
        for (kind, mut profile) in document.kinds {
            if profile.display_name.is_empty() {
                profile.display_name.clone_from(&kind);
            }
            tracing::debug!(kind = %kind, "catalog override");
            self.kinds.insert(kind, profile);
        }
        Ok(count)
    }
}
