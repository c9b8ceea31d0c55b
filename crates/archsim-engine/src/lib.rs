//! Archsim Engine
//!
//! Pure analysis passes over a component graph, plus a session type that
//! drives them on a clock:
//! - [`analyze_topology`]: critical path, single points of failure, bottleneck
//! - [`propagate_load`]: steady-state request rate arriving at every node
//! - [`compute_metrics`]: throughput, latency percentiles, availability, cost
//! - [`resolve_validation_context`]: scale tier and the thresholds it implies
//! - [`validate`]: tier-aware checks, dimension scores, grade and verdict
//! - [`tick`]: one simulation step producing per-node updates and alerts
//!
//! Every pass is deterministic over its inputs. Only [`traffic`] draws
//! random numbers, from a seeded generator.
//!
//! # Example
//!
//! ```rust
//! use archsim_engine::prelude::*;
//!
//! let mut store = GraphStore::new();
//! let client = store.add_node("web-client", "Browser");
//! let server = store.add_node("web-server", "API");
//! let db = store.add_node("postgres", "DB");
//! store.connect(client, server)?;
//! store.connect(server, db)?;
//!
//! let analysis = analyze_topology(store.catalog(), store.nodes(), store.edges());
//! assert!(analysis.is_spof(server));
//!
//! let metrics = compute_metrics(store.catalog(), store.nodes(), store.edges(), 100.0);
//! assert!(metrics.availability < 0.99999);
//! # Ok::<(), archsim_model::ModelError>(())
//! ```

pub mod config;
pub mod error;
pub mod graph_view;
pub mod metrics;
pub mod propagation;
pub mod scale_tier;
pub mod scheduler;
pub mod simulation;
pub mod tick;
pub mod topology;
pub mod traffic;
pub mod validator;

pub use config::SimulationConfig;
pub use error::{EngineError, Result};
pub use graph_view::GraphView;
pub use metrics::{compute_metrics, AiMetrics, MetricField, MetricSnapshot, MetricsHistory};
pub use propagation::{propagate_load, LoadMap};
pub use scale_tier::{resolve_validation_context, ScaleTier, TierThresholds, ValidationContext};
pub use scheduler::{FailureInjector, TickGate};
pub use simulation::Simulation;
pub use tick::{tick, Alert, AlertKind, TickOutcome};
pub use topology::{analyze_topology, TopologyAnalysis};
pub use traffic::TrafficShaper;
pub use validator::{
    validate, Check, CheckId, CheckOutcome, Dimension, Grade, Severity, ValidationReport, Verdict,
    VerdictKind,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving the engine
    pub use crate::{
        analyze_topology, compute_metrics, propagate_load, resolve_validation_context, tick,
        validate, Grade, MetricSnapshot, ScaleTier, Simulation, SimulationConfig, TickOutcome,
        TopologyAnalysis, ValidationReport,
    };
    pub use archsim_model::{Catalog, GraphStore, NodeId, Scenario, TrafficPattern};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
