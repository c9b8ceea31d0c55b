//! Error types for the graph model
//!
//! Analysis code never fails on a structurally valid graph. Errors only come
//! from editing operations on [`GraphStore`](crate::GraphStore) and from
//! loading catalog overrides.

use crate::ids::{EdgeId, NodeId};

/// Model error type
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Node id is not part of the graph
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// Edge id is not part of the graph
    #[error("edge not found: {0}")]
    EdgeNotFound(EdgeId),

    /// Edge would connect a node to itself
    #[error("self-loop on {0}")]
    SelfLoop(NodeId),

    /// An edge between the two nodes already exists
    #[error("edge {source_id} -> {target_id} already exists")]
    DuplicateEdge {
        /// Source endpoint
        source_id: NodeId,
        /// Target endpoint
        target_id: NodeId,
    },

    /// Replica count below one
    #[error("replica count must be at least 1, got {0}")]
    InvalidReplicaCount(u32),

    /// Catalog override document could not be parsed
    #[error("catalog parse error: {0}")]
    CatalogParse(#[from] toml::de::Error),
}

impl ModelError {
    /// Check whether the error refers to a missing graph element
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound(_) | Self::EdgeNotFound(_))
    }
}

/// Result alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
