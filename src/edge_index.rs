//! Edge indexer: a fixed slot for every undirected edge.
//!
//! ## Determinism
//!
//! Slots follow the sorted edge order `(u, v)` with `u < v`. The order only
//! has to be self-consistent within one run: build the index once per graph
//! and pass the same instance to every stage that produces or reads masks.

use std::collections::HashMap;

use crate::types::{SimpleGraph, TreeMask, UndirectedEdge, MAX_EDGE_SLOTS};

/// Error type for edge index operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// The graph has more edges than a mask can address.
    #[error("Graph has {edges} edges, masks address at most {max}")]
    CapacityExceeded {
        /// Edge count of the graph.
        edges: usize,
        /// Slot capacity of a mask.
        max: usize,
    },
    /// A mask sets bits beyond the index, so it was built against another graph.
    #[error("Mask of bit width {bit_width} does not fit an edge index of {slots} slots")]
    InconsistentEdgeIndex {
        /// Bit width of the mask.
        bit_width: usize,
        /// Slots in the index.
        slots: usize,
    },
    /// An edge is not present in the index.
    #[error("Edge {0} is not in the edge index")]
    UnknownEdge(UndirectedEdge),
}

/// Bijection between the edges of a graph and slots `0..|E|`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeIndex {
    edges: Vec<UndirectedEdge>,
    slots: HashMap<UndirectedEdge, usize>,
}

impl EdgeIndex {
    /// Index the edges of `graph`.
    pub fn build(graph: &SimpleGraph) -> Result<Self, IndexError> {
        Self::from_edges(graph.edges().iter().copied())
    }

    /// Index an edge list. Edges are normalized and sorted; duplicates collapse.
    pub fn from_edges<I, E>(edges: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = E>,
        E: Into<UndirectedEdge>,
    {
        let mut edges: Vec<UndirectedEdge> = edges.into_iter().map(Into::into).collect();
        edges.sort_unstable();
        edges.dedup();

        if edges.len() > MAX_EDGE_SLOTS {
            return Err(IndexError::CapacityExceeded {
                edges: edges.len(),
                max: MAX_EDGE_SLOTS,
            });
        }

        let slots = edges.iter().enumerate().map(|(slot, &e)| (e, slot)).collect();
        Ok(Self { edges, slots })
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the index has no slots.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edges in slot order.
    pub fn edges(&self) -> &[UndirectedEdge] {
        &self.edges
    }

    /// Edge stored at `slot`.
    pub fn edge(&self, slot: usize) -> Option<UndirectedEdge> {
        self.edges.get(slot).copied()
    }

    /// Slot of `{a, b}`, in either endpoint order.
    pub fn slot(&self, a: usize, b: usize) -> Option<usize> {
        self.slots.get(&UndirectedEdge::new(a, b)).copied()
    }

    /// Mask with every slot set.
    pub fn full_mask(&self) -> TreeMask {
        TreeMask::full(self.len())
    }

    /// Encode an edge set as a mask.
    pub fn mask_of<I, E>(&self, edges: I) -> Result<TreeMask, IndexError>
    where
        I: IntoIterator<Item = E>,
        E: Into<UndirectedEdge>,
    {
        let mut mask = TreeMask::EMPTY;
        for edge in edges {
            let edge = edge.into();
            let slot = self
                .slots
                .get(&edge)
                .copied()
                .ok_or(IndexError::UnknownEdge(edge))?;
            mask.insert(slot);
        }
        Ok(mask)
    }

    /// Decode a mask into its edges, in slot order.
    pub fn edges_of(&self, mask: TreeMask) -> Result<Vec<UndirectedEdge>, IndexError> {
        self.check_mask(mask)?;
        Ok(mask.slots().map(|slot| self.edges[slot]).collect())
    }

    /// Fail if `mask` sets a bit past the last slot.
    pub fn check_mask(&self, mask: TreeMask) -> Result<(), IndexError> {
        let bit_width = mask.bit_width();
        if bit_width > self.len() {
            return Err(IndexError::InconsistentEdgeIndex {
                bit_width,
                slots: self.len(),
            });
        }
        Ok(())
    }
}

/// Build the edge index of `graph`: the edges in slot order plus the
/// edge-to-slot lookup.
pub fn build_edge_index(graph: &SimpleGraph) -> Result<EdgeIndex, IndexError> {
    EdgeIndex::build(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_follow_sorted_edges() {
        let graph = SimpleGraph::from_edges(4, [(3, 2), (1, 0), (2, 1)]).unwrap();
        let index = build_edge_index(&graph).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.edge(0), Some(UndirectedEdge::new(0, 1)));
        assert_eq!(index.edge(2), Some(UndirectedEdge::new(2, 3)));
        assert_eq!(index.slot(2, 1), Some(1));
        assert_eq!(index.slot(0, 3), None);
    }

    #[test]
    fn test_bijection() {
        let graph = crate::solids::PlatonicSolid::Icosahedron.graph();
        let index = EdgeIndex::build(&graph).unwrap();
        for (slot, edge) in index.edges().iter().enumerate() {
            assert_eq!(index.slot(edge.v, edge.u), Some(slot));
        }
    }

    #[test]
    fn test_mask_round_trip() {
        let index = EdgeIndex::build(&SimpleGraph::cycle(4)).unwrap();
        let mask = index.mask_of([(1, 0), (3, 0)]).unwrap();
        assert_eq!(mask.bits(), 0b011);
        assert_eq!(
            index.edges_of(mask).unwrap(),
            vec![UndirectedEdge::new(0, 1), UndirectedEdge::new(0, 3)]
        );
    }

    #[test]
    fn test_unknown_edge() {
        let index = EdgeIndex::build(&SimpleGraph::path(3)).unwrap();
        let err = index.mask_of([(0, 2)]).unwrap_err();
        assert_eq!(err, IndexError::UnknownEdge(UndirectedEdge::new(0, 2)));
    }

    #[test]
    fn test_inconsistent_mask() {
        let index = EdgeIndex::build(&SimpleGraph::path(3)).unwrap();
        assert!(index.check_mask(TreeMask::new(0b11)).is_ok());
        let err = index.check_mask(TreeMask::new(0b100)).unwrap_err();
        assert_eq!(err, IndexError::InconsistentEdgeIndex { bit_width: 3, slots: 2 });
    }

    #[test]
    fn test_capacity() {
        // K_17 has 136 edges
        let err = EdgeIndex::build(&SimpleGraph::complete(17)).unwrap_err();
        assert!(matches!(err, IndexError::CapacityExceeded { edges: 136, .. }));
        assert!(EdgeIndex::build(&SimpleGraph::complete(16)).is_ok());
    }

    #[test]
    fn test_empty_graph() {
        let index = EdgeIndex::build(&SimpleGraph::empty(3)).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.full_mask(), TreeMask::EMPTY);
    }
}
