//! Simple undirected graph over vertices `0..n`.

use std::collections::BTreeSet;
use std::fmt;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};

/// Error type for graph construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An edge joins a vertex to itself.
    #[error("Self-loop at vertex {0}")]
    SelfLoop(usize),
    /// An edge names a vertex outside `0..n`.
    #[error("Vertex {vertex} out of range for graph with {vertex_count} vertices")]
    VertexOutOfRange {
        /// Offending vertex.
        vertex: usize,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },
}

/// Undirected edge, normalized so that `u < v`.
///
/// Implements `Ord` as (u, v), which is the slot order used by the edge index.
/// Deserializing normalizes the endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "EdgeRecord")]
pub struct UndirectedEdge {
    /// Smaller endpoint.
    pub u: usize,
    /// Larger endpoint.
    pub v: usize,
}

impl UndirectedEdge {
    /// Create a normalized edge from two endpoints in any order.
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { u: a, v: b }
        } else {
            Self { u: b, v: a }
        }
    }

    /// Endpoints as a tuple.
    pub fn endpoints(&self) -> (usize, usize) {
        (self.u, self.v)
    }
}

impl From<(usize, usize)> for UndirectedEdge {
    fn from((a, b): (usize, usize)) -> Self {
        Self::new(a, b)
    }
}

#[derive(Deserialize)]
struct EdgeRecord {
    u: usize,
    v: usize,
}

impl From<EdgeRecord> for UndirectedEdge {
    fn from(record: EdgeRecord) -> Self {
        Self::new(record.u, record.v)
    }
}

impl fmt::Display for UndirectedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.u, self.v)
    }
}

/// Finite simple undirected graph.
///
/// Edges are stored normalized and sorted, so two graphs built from the same
/// edge set compare equal regardless of input order. Serialized as
/// `{vertex_count, edges}`; deserializing goes through [`SimpleGraph::from_edges`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GraphRecord", into = "GraphRecord")]
pub struct SimpleGraph {
    vertex_count: usize,
    edges: Vec<UndirectedEdge>,
    adjacency: Vec<BTreeSet<usize>>,
}

#[derive(Serialize, Deserialize)]
struct GraphRecord {
    vertex_count: usize,
    edges: Vec<UndirectedEdge>,
}

impl TryFrom<GraphRecord> for SimpleGraph {
    type Error = GraphError;

    fn try_from(record: GraphRecord) -> Result<Self, Self::Error> {
        Self::from_edges(record.vertex_count, record.edges)
    }
}

impl From<SimpleGraph> for GraphRecord {
    fn from(graph: SimpleGraph) -> Self {
        Self {
            vertex_count: graph.vertex_count,
            edges: graph.edges,
        }
    }
}

impl SimpleGraph {
    /// Create a graph with `vertex_count` vertices and no edges.
    pub fn empty(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            edges: Vec::new(),
            adjacency: vec![BTreeSet::new(); vertex_count],
        }
    }

    /// Build a graph from an edge list. Duplicate edges collapse.
    pub fn from_edges<I, E>(vertex_count: usize, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = E>,
        E: Into<UndirectedEdge>,
    {
        let mut graph = Self::empty(vertex_count);
        for edge in edges {
            let edge = edge.into();
            graph.add_edge(edge.u, edge.v)?;
        }
        Ok(graph)
    }

    /// Build a graph from an adjacency list indexed by vertex.
    ///
    /// The list is symmetrized: `j` in `adj[i]` adds the edge `{i, j}` even if
    /// `i` is missing from `adj[j]`.
    pub fn from_adjacency(adjacency: &[Vec<usize>]) -> Result<Self, GraphError> {
        let mut graph = Self::empty(adjacency.len());
        for (i, neighbors) in adjacency.iter().enumerate() {
            for &j in neighbors {
                graph.add_edge(i, j)?;
            }
        }
        Ok(graph)
    }

    /// Path graph `0 - 1 - ... - (n-1)`.
    pub fn path(n: usize) -> Self {
        let mut graph = Self::empty(n);
        for i in 1..n {
            graph.insert(UndirectedEdge::new(i - 1, i));
        }
        graph
    }

    /// Cycle graph on `n >= 3` vertices. Smaller `n` degrades to a path.
    pub fn cycle(n: usize) -> Self {
        let mut graph = Self::path(n);
        if n >= 3 {
            graph.insert(UndirectedEdge::new(0, n - 1));
        }
        graph
    }

    /// Complete graph `K_n`.
    pub fn complete(n: usize) -> Self {
        let mut graph = Self::empty(n);
        for u in 0..n {
            for v in (u + 1)..n {
                graph.insert(UndirectedEdge::new(u, v));
            }
        }
        graph
    }

    /// Add an undirected edge. Adding an existing edge is a no-op.
    pub fn add_edge(&mut self, a: usize, b: usize) -> Result<(), GraphError> {
        for vertex in [a, b] {
            if vertex >= self.vertex_count {
                return Err(GraphError::VertexOutOfRange {
                    vertex,
                    vertex_count: self.vertex_count,
                });
            }
        }
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        self.insert(UndirectedEdge::new(a, b));
        Ok(())
    }

    fn insert(&mut self, edge: UndirectedEdge) {
        if self.adjacency[edge.u].insert(edge.v) {
            self.adjacency[edge.v].insert(edge.u);
            // Keep edges sorted
            let pos = self.edges.binary_search(&edge).unwrap_or_else(|p| p);
            self.edges.insert(pos, edge);
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All edges, normalized and sorted.
    pub fn edges(&self) -> &[UndirectedEdge] {
        &self.edges
    }

    /// Neighbors of `v` in ascending order. Empty for unknown vertices.
    pub fn neighbors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency.get(v).into_iter().flat_map(|set| set.iter().copied())
    }

    /// Degree of `v`.
    pub fn degree(&self, v: usize) -> usize {
        self.adjacency.get(v).map_or(0, BTreeSet::len)
    }

    /// Whether `{a, b}` is an edge.
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.adjacency.get(a).is_some_and(|set| set.contains(&b))
    }

    /// Whether every vertex is reachable from every other.
    ///
    /// The graph with no vertices is treated as disconnected.
    pub fn is_connected(&self) -> bool {
        if self.vertex_count == 0 {
            return false;
        }
        let mut components = UnionFind::<usize>::new(self.vertex_count);
        let mut remaining = self.vertex_count - 1;
        for edge in &self.edges {
            if components.union(edge.u, edge.v) {
                remaining -= 1;
            }
        }
        remaining == 0
    }

    /// Convert to a petgraph graph whose node indices equal vertex ids.
    pub fn to_petgraph(&self) -> UnGraph<(), ()> {
        let mut graph = UnGraph::with_capacity(self.vertex_count, self.edges.len());
        for _ in 0..self.vertex_count {
            graph.add_node(());
        }
        for edge in &self.edges {
            graph.add_edge(NodeIndex::new(edge.u), NodeIndex::new(edge.v), ());
        }
        graph
    }
}
