//! Graph vertices: stable handles, traversal labels, and per-vertex search
//! bookkeeping (costs, predecessor edge, adjacency).

use super::edge::EdgeId;
use crate::collections::TreeMap;
use std::fmt;

/// Stable handle for a vertex. Handles are never reused within one graph
/// lifetime, and adjacency lists store handles rather than references, so
/// registry rebalancing cannot invalidate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub usize);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Traversal status of a vertex.
///
/// `Depth` is the iterative-deepening tag: each IDDFS iteration rebuilds the
/// graph, and tagging discovered vertices with their depth keeps labels from
/// one iteration from aliasing the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexLabel {
    Unvisited,
    Processing,
    Visited,
    Depth(u32),
}

/// Cost of a vertex no path has reached yet.
pub const UNREACHED: u32 = u32::MAX;

/// One search-tree node. `D` is the payload; the solver stores the delta
/// sequence from the root grid there.
pub struct Vertex<D> {
    id: VertexId,
    data: D,
    current_cost: u32,
    heuristic_cost: u32,
    label: VertexLabel,
    predecessor: Option<EdgeId>,
    adjacency: TreeMap<EdgeId, VertexId>,
}

impl<D> Vertex<D> {
    pub(crate) fn new(id: VertexId, data: D) -> Self {
        Self {
            id,
            data,
            current_cost: UNREACHED,
            heuristic_cost: 0,
            label: VertexLabel::Unvisited,
            predecessor: None,
            adjacency: TreeMap::new(),
        }
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    /// Accumulated path cost; meaning is algorithm-dependent (search depth
    /// for IDDFS, g(n) + h(n) for A*).
    pub fn current_cost(&self) -> u32 {
        self.current_cost
    }

    pub fn set_current_cost(&mut self, cost: u32) {
        self.current_cost = cost;
    }

    /// h(n) estimate; zero for algorithms that do not use one.
    pub fn heuristic_cost(&self) -> u32 {
        self.heuristic_cost
    }

    pub fn set_heuristic_cost(&mut self, cost: u32) {
        self.heuristic_cost = cost;
    }

    pub fn label(&self) -> VertexLabel {
        self.label
    }

    pub fn set_label(&mut self, label: VertexLabel) {
        self.label = label;
    }

    /// Edge this vertex was best reached through (set by relaxation).
    pub fn predecessor(&self) -> Option<EdgeId> {
        self.predecessor
    }

    pub fn set_predecessor(&mut self, edge: Option<EdgeId>) {
        self.predecessor = edge;
    }

    /// Incident edges, keyed by edge handle (ascending = creation order),
    /// mapping to the opposite endpoint.
    pub fn adjacency(&self) -> &TreeMap<EdgeId, VertexId> {
        &self.adjacency
    }

    pub(crate) fn adjacency_mut(&mut self) -> &mut TreeMap<EdgeId, VertexId> {
        &mut self.adjacency
    }

    pub fn degree(&self) -> usize {
        self.adjacency.len()
    }
}
