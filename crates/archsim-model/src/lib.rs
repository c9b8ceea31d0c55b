//! Archsim Model
//!
//! Data model shared by the analysis engine and its consumers:
//! - [`Catalog`]: component kinds and their performance profiles
//! - [`GraphStore`]: placed nodes, directed edges and the id sequence
//! - [`Scenario`] and [`TrafficPattern`]: external simulation inputs
//!
//! # Example
//!
//! ```rust
//! use archsim_model::GraphStore;
//!
//! let mut store = GraphStore::new();
//! let client = store.add_node("web-client", "Browser");
//! let server = store.add_node("web-server", "API");
//! store.connect(client, server)?;
//! assert_eq!(store.edge_count(), 1);
//! # Ok::<(), archsim_model::ModelError>(())
//! ```

pub mod catalog;
pub mod error;
pub mod graph;
pub mod ids;
pub mod scenario;
pub mod traffic;

pub use catalog::{CapAlignment, Catalog, Category, ComponentProfile, ConsistencyModel, Role};
pub use error::{ModelError, Result};
pub use graph::{
    Edge, GraphDocument, GraphStore, HealthStatus, Node, NodeConfig, NodeSimState, NodeUpdate,
};
pub use ids::{EdgeId, IdGenerator, NodeId};
pub use scenario::Scenario;
pub use traffic::{TrafficPattern, UnknownPattern};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
