//! Identifiers for graph elements
//!
//! Ids are plain integers handed out by an [`IdGenerator`] owned by the
//! graph store. There is no process-wide counter, so two stores never share
//! id sequences and tests do not leak state into each other.

use serde::{Deserialize, Serialize};

/// Node identifier, unique within one graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Edge identifier, unique within one graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u64);

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "edge-{}", self.0)
    }
}

/// Monotonic id source
///
/// Node and edge ids come from the same sequence, which keeps ids unique
/// across both kinds and makes debug output easy to follow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    /// Create a generator starting at 1
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Create a generator that continues after `last`
    #[inline]
    #[must_use]
    pub fn starting_after(last: u64) -> Self {
        Self {
            next: last.saturating_add(1),
        }
    }

    /// Next node id
    pub fn next_node(&mut self) -> NodeId {
        NodeId(self.bump())
    }

    /// Next edge id
    pub fn next_edge(&mut self) -> EdgeId {
        EdgeId(self.bump())
    }

    /// Make sure future ids are greater than `seen`
    ///
    /// The sequence saturates at `u64::MAX`.
    pub fn observe(&mut self, seen: u64) {
        if seen >= self.next {
            self.next = seen.saturating_add(1);
        }
    }

    fn bump(&mut self) -> u64 {
        if self.next == 0 {
            self.next = 1;
        }
        let id = self.next;
        if id == u64::MAX {
            tracing::warn!("id sequence exhausted, reusing the last id");
        }
        self.next = id.saturating_add(1);
        id
    }
}
