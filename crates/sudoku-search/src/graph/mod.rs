//! Mutable vertex/edge container used as a lazily expanded search tree.
//!
//! Vertices and edges live in red-black tree registries keyed by
//! monotonically increasing handles. Removing a vertex cascades to every
//! incident edge, which is what lets the solver evict fully expanded states
//! and keep memory bounded to one frontier generation.

mod edge;
mod vertex;

pub use edge::{Edge, EdgeId};
pub use vertex::{Vertex, VertexId, VertexLabel, UNREACHED};

use crate::collections::TreeMap;
use std::fmt;

/// Whether edges are one-way. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Directed,
    Undirected,
}

/// Recoverable lookup failure for graph accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    VertexNotFound(VertexId),
    EdgeNotFound(EdgeId),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VertexNotFound(id) => write!(f, "vertex {} not found", id),
            Self::EdgeNotFound(id) => write!(f, "edge {} not found", id),
        }
    }
}

impl std::error::Error for GraphError {}

/// A graph G = (V, E) with payloads of type `D` on the vertices.
///
/// In an undirected graph both endpoints register the connecting edge in
/// their adjacency lists; in a directed graph only the source does.
pub struct Graph<D> {
    vertices: TreeMap<VertexId, Vertex<D>>,
    edges: TreeMap<EdgeId, Edge>,
    next_vertex_id: usize,
    next_edge_id: usize,
    orientation: Orientation,
}

impl<D> Graph<D> {
    /// Create an empty graph with the given orientation.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            vertices: TreeMap::new(),
            edges: TreeMap::new(),
            next_vertex_id: 0,
            next_edge_id: 0,
            orientation,
        }
    }

    pub fn directed() -> Self {
        Self::new(Orientation::Directed)
    }

    pub fn undirected() -> Self {
        Self::new(Orientation::Undirected)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Add a vertex carrying `data`; handles are assigned sequentially
    /// starting at 0.
    pub fn add_vertex(&mut self, data: D) -> VertexId {
        let id = VertexId(self.next_vertex_id);
        self.next_vertex_id += 1;
        self.vertices.insert(id, Vertex::new(id, data));
        id
    }

    /// Add an edge from `source` to `target`. Fails when either endpoint is
    /// absent. The edge counter only advances on success.
    pub fn add_edge(
        &mut self,
        source: VertexId,
        target: VertexId,
        cost: u32,
    ) -> Result<EdgeId, GraphError> {
        if !self.vertices.contains(&target) {
            return Err(GraphError::VertexNotFound(target));
        }

        let id = EdgeId(self.next_edge_id);

        self.vertices
            .get_mut(&source)
            .ok_or(GraphError::VertexNotFound(source))?
            .adjacency_mut()
            .insert(id, target);
        if self.orientation == Orientation::Undirected {
            self.vertices
                .get_mut(&target)
                .ok_or(GraphError::VertexNotFound(target))?
                .adjacency_mut()
                .insert(id, source);
        }

        self.next_edge_id += 1;
        self.edges.insert(id, Edge::new(id, source, target, cost));
        Ok(id)
    }

    /// Remove a vertex and every edge incident to it. Returns false when the
    /// vertex is absent.
    pub fn remove_vertex(&mut self, id: VertexId) -> bool {
        let registered: Vec<EdgeId> = match self.vertices.get(&id) {
            None => return false,
            Some(vertex) => vertex.adjacency().keys().copied().collect(),
        };
        for edge_id in registered {
            self.remove_edge(edge_id);
        }

        if self.orientation == Orientation::Directed {
            // Inbound edges are registered only with their source, so they
            // have to be found by scanning the edge registry.
            let inbound: Vec<EdgeId> = self
                .edges
                .iter()
                .filter(|(_, edge)| edge.target() == id)
                .map(|(edge_id, _)| *edge_id)
                .collect();
            for edge_id in inbound {
                self.remove_edge(edge_id);
            }
        }

        self.vertices.remove(&id).is_some()
    }

    /// Remove an edge, detaching it from whichever endpoint(s) registered
    /// it. Returns false when the edge is absent.
    pub fn remove_edge(&mut self, id: EdgeId) -> bool {
        let edge = match self.edges.remove(&id) {
            None => return false,
            Some(edge) => edge,
        };
        let (source, target) = edge.endpoints();

        match self.orientation {
            Orientation::Directed => {
                if let Some(vertex) = self.vertices.get_mut(&source) {
                    vertex.adjacency_mut().remove(&id);
                }
            }
            Orientation::Undirected => {
                if let Some(vertex) = self.vertices.get_mut(&source) {
                    vertex.adjacency_mut().remove(&id);
                }
                if let Some(vertex) = self.vertices.get_mut(&target) {
                    vertex.adjacency_mut().remove(&id);
                }
            }
        }

        true
    }

    pub fn vertex(&self, id: VertexId) -> Result<&Vertex<D>, GraphError> {
        self.vertices.get(&id).ok_or(GraphError::VertexNotFound(id))
    }

    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut Vertex<D>, GraphError> {
        self.vertices
            .get_mut(&id)
            .ok_or(GraphError::VertexNotFound(id))
    }

    pub fn edge(&self, id: EdgeId) -> Result<&Edge, GraphError> {
        self.edges.get(&id).ok_or(GraphError::EdgeNotFound(id))
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains(&id)
    }

    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains(&id)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Handle of the most recently created vertex.
    pub fn last_vertex_id(&self) -> Option<VertexId> {
        self.next_vertex_id.checked_sub(1).map(VertexId)
    }

    /// Handle of the most recently created edge.
    pub fn last_edge_id(&self) -> Option<EdgeId> {
        self.next_edge_id.checked_sub(1).map(EdgeId)
    }

    /// The endpoint of `edge` opposite to `vertex`.
    pub fn opposite(&self, vertex: VertexId, edge: EdgeId) -> Result<VertexId, GraphError> {
        let edge = self.edge(edge)?;
        edge.opposite(vertex)
            .ok_or(GraphError::VertexNotFound(vertex))
    }

    /// Drop every vertex and edge and reset the handle counters. Used to
    /// rebuild the search tree between runs (and between IDDFS iterations).
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.next_vertex_id = 0;
        self.next_edge_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_vertex_assigns_sequential_ids() {
        let mut graph: Graph<&str> = Graph::directed();
        assert_eq!(graph.add_vertex("a"), VertexId(0));
        assert_eq!(graph.add_vertex("b"), VertexId(1));
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.last_vertex_id(), Some(VertexId(1)));
        assert_eq!(graph.vertex(VertexId(0)).unwrap().data(), &"a");
    }

    #[test]
    fn test_add_edge_requires_both_endpoints() {
        let mut graph: Graph<()> = Graph::directed();
        let u = graph.add_vertex(());
        assert_eq!(
            graph.add_edge(u, VertexId(9), 0),
            Err(GraphError::VertexNotFound(VertexId(9)))
        );
        // Failed adds must not burn edge handles.
        assert_eq!(graph.last_edge_id(), None);

        let v = graph.add_vertex(());
        let edge = graph.add_edge(u, v, 3).unwrap();
        assert_eq!(edge, EdgeId(0));
        assert_eq!(graph.edge(edge).unwrap().cost(), 3);
        assert_eq!(graph.edge(edge).unwrap().endpoints(), (u, v));
    }

    #[test]
    fn test_directed_adjacency_is_source_only() {
        let mut graph: Graph<()> = Graph::directed();
        let u = graph.add_vertex(());
        let v = graph.add_vertex(());
        let edge = graph.add_edge(u, v, 0).unwrap();

        assert_eq!(graph.vertex(u).unwrap().adjacency().get(&edge), Some(&v));
        assert_eq!(graph.vertex(v).unwrap().degree(), 0);
    }

    #[test]
    fn test_undirected_adjacency_is_both_ends() {
        let mut graph: Graph<()> = Graph::undirected();
        let u = graph.add_vertex(());
        let v = graph.add_vertex(());
        let edge = graph.add_edge(u, v, 0).unwrap();

        assert_eq!(graph.vertex(u).unwrap().adjacency().get(&edge), Some(&v));
        assert_eq!(graph.vertex(v).unwrap().adjacency().get(&edge), Some(&u));
        assert_eq!(graph.opposite(u, edge).unwrap(), v);
        assert_eq!(graph.opposite(v, edge).unwrap(), u);
    }

    #[test]
    fn test_remove_edge_detaches_endpoints() {
        let mut graph: Graph<()> = Graph::undirected();
        let u = graph.add_vertex(());
        let v = graph.add_vertex(());
        let edge = graph.add_edge(u, v, 0).unwrap();

        assert!(graph.remove_edge(edge));
        assert!(!graph.contains_edge(edge));
        assert_eq!(graph.vertex(u).unwrap().degree(), 0);
        assert_eq!(graph.vertex(v).unwrap().degree(), 0);
        assert!(!graph.remove_edge(edge));
    }

    #[test]
    fn test_remove_vertex_cascades_directed() {
        let mut graph: Graph<()> = Graph::directed();
        let u = graph.add_vertex(());
        let v = graph.add_vertex(());
        let w = graph.add_vertex(());
        let outbound = graph.add_edge(v, w, 0).unwrap();
        let inbound = graph.add_edge(u, v, 0).unwrap();

        assert!(graph.remove_vertex(v));
        assert!(!graph.contains_vertex(v));
        // Both the outbound edge and the inbound edge (stored only in u's
        // adjacency) must be gone.
        assert!(!graph.contains_edge(outbound));
        assert!(!graph.contains_edge(inbound));
        assert_eq!(graph.vertex(u).unwrap().degree(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_remove_vertex_cascades_undirected() {
        let mut graph: Graph<()> = Graph::undirected();
        let hub = graph.add_vertex(());
        let spokes: Vec<VertexId> = (0..3).map(|_| graph.add_vertex(())).collect();
        let edges: Vec<EdgeId> = spokes
            .iter()
            .map(|&s| graph.add_edge(hub, s, 0).unwrap())
            .collect();

        assert!(graph.remove_vertex(hub));
        for edge in edges {
            assert!(!graph.contains_edge(edge));
        }
        for spoke in spokes {
            assert_eq!(graph.vertex(spoke).unwrap().degree(), 0);
        }
    }

    #[test]
    fn test_remove_absent_vertex_is_noop() {
        let mut graph: Graph<()> = Graph::directed();
        assert!(!graph.remove_vertex(VertexId(0)));
    }

    #[test]
    fn test_ids_are_not_reused_after_removal() {
        let mut graph: Graph<()> = Graph::directed();
        let a = graph.add_vertex(());
        graph.remove_vertex(a);
        let b = graph.add_vertex(());
        assert_eq!(b, VertexId(1));
    }

    #[test]
    fn test_accessors_are_recoverable() {
        let graph: Graph<()> = Graph::directed();
        assert_eq!(
            graph.vertex(VertexId(7)).err(),
            Some(GraphError::VertexNotFound(VertexId(7)))
        );
        assert_eq!(
            graph.edge(EdgeId(7)).err(),
            Some(GraphError::EdgeNotFound(EdgeId(7)))
        );
        assert_eq!(
            graph.vertex(VertexId(7)).err().map(|e| e.to_string()),
            Some("vertex v7 not found".to_string())
        );
    }

    #[test]
    fn test_clear_resets_counters() {
        let mut graph: Graph<()> = Graph::directed();
        let u = graph.add_vertex(());
        let v = graph.add_vertex(());
        graph.add_edge(u, v, 0).unwrap();

        graph.clear();
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.add_vertex(()), VertexId(0));
    }

    #[test]
    fn test_vertex_cost_and_label_bookkeeping() {
        let mut graph: Graph<()> = Graph::directed();
        let u = graph.add_vertex(());

        let vertex = graph.vertex(u).unwrap();
        assert_eq!(vertex.current_cost(), UNREACHED);
        assert_eq!(vertex.label(), VertexLabel::Unvisited);
        assert_eq!(vertex.predecessor(), None);

        let vertex = graph.vertex_mut(u).unwrap();
        vertex.set_current_cost(4);
        vertex.set_heuristic_cost(2);
        vertex.set_label(VertexLabel::Depth(4));
        let vertex = graph.vertex(u).unwrap();
        assert_eq!(vertex.current_cost(), 4);
        assert_eq!(vertex.heuristic_cost(), 2);
        assert_eq!(vertex.label(), VertexLabel::Depth(4));
    }
}
