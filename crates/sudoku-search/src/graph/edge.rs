//! Graph edges: a costed connection between two vertex handles.

use super::vertex::VertexId;
use std::fmt;

/// Stable handle for an edge; never reused within one graph lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub usize);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// An edge between two vertices. The endpoint order is (source, target);
/// it is significant only in directed graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    id: EdgeId,
    cost: u32,
    endpoints: (VertexId, VertexId),
}

impl Edge {
    pub(crate) fn new(id: EdgeId, source: VertexId, target: VertexId, cost: u32) -> Self {
        Self {
            id,
            cost,
            endpoints: (source, target),
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn endpoints(&self) -> (VertexId, VertexId) {
        self.endpoints
    }

    pub fn source(&self) -> VertexId {
        self.endpoints.0
    }

    pub fn target(&self) -> VertexId {
        self.endpoints.1
    }

    /// The endpoint that is not `vertex`, or `None` when `vertex` is not an
    /// endpoint of this edge.
    pub fn opposite(&self, vertex: VertexId) -> Option<VertexId> {
        if self.endpoints.0 == vertex {
            Some(self.endpoints.1)
        } else if self.endpoints.1 == vertex {
            Some(self.endpoints.0)
        } else {
            None
        }
    }
}
