//! Automorphism and spanning-tree enumeration.
//!
//! The orbit pipeline only consumes these through the two traits below, so
//! any correct enumerator can be plugged in.

pub mod brute_force;
pub mod spanning;
pub mod vf2;

use crate::types::{Automorphism, SimpleGraph};

pub use brute_force::{automorphisms_from_matrix, BruteForceAutomorphisms, DEFAULT_BRUTE_FORCE_LIMIT};
pub use spanning::{BranchingTreeEnumerator, SpanningTree, SpanningTreeIter};
pub use vf2::Vf2Automorphisms;

/// Error type for enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnumerationError {
    /// Brute force refused a graph above its vertex limit.
    #[error("Brute-force automorphism search refused: {vertices} vertices exceeds limit {limit}")]
    BruteForceLimit {
        /// Vertex count of the graph.
        vertices: usize,
        /// Configured limit.
        limit: usize,
    },
    /// A backend produced a mapping that is not an automorphism.
    #[error("Enumerator produced a non-automorphism: {0}")]
    InvalidMapping(Automorphism),
    /// The identity is missing from the produced group.
    #[error("Enumerator omitted the identity automorphism")]
    MissingIdentity,
    /// The graph has more edges than the tree enumerator can track.
    #[error("Graph has {edges} edges, tree enumeration supports at most {max}")]
    TooManyEdges {
        /// Edge count of the graph.
        edges: usize,
        /// Supported maximum.
        max: usize,
    },
}

/// Enumerates the automorphism group of a graph.
///
/// Implementations must return every automorphism exactly once, including the
/// identity, in a deterministic order.
pub trait AutomorphismEnumerator {
    /// Enumerate `Aut(graph)`.
    fn automorphisms(&self, graph: &SimpleGraph) -> Result<Vec<Automorphism>, EnumerationError>;
}

/// Enumerates the spanning trees of a graph.
///
/// Implementations must yield every spanning tree exactly once. A single pass
/// is enough; no restart guarantee is required.
pub trait SpanningTreeEnumerator {
    /// Iterator over trees.
    type Iter<'g>: Iterator<Item = SpanningTree>
    where
        Self: 'g;

    /// Lazily enumerate the spanning trees of `graph`.
    fn spanning_trees<'g>(
        &'g self,
        graph: &'g SimpleGraph,
    ) -> Result<Self::Iter<'g>, EnumerationError>;
}

/// Sort, dedup and sanity-check the output of an automorphism backend.
pub(crate) fn finish_group(
    graph: &SimpleGraph,
    mut group: Vec<Automorphism>,
) -> Result<Vec<Automorphism>, EnumerationError> {
    group.sort_unstable();
    group.dedup();
    if let Some(bad) = group.iter().find(|a| !a.preserves(graph)) {
        return Err(EnumerationError::InvalidMapping(bad.clone()));
    }
    if !group.iter().any(Automorphism::is_identity) {
        return Err(EnumerationError::MissingIdentity);
    }
    Ok(group)
}
