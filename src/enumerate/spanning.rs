//! Lazy spanning-tree enumeration by include/exclude branching.
//!
//! ## Algorithm
//!
//! Edges are decided in sorted order. A search frame holds the edges chosen
//! so far and the edges removed so far:
//!
//! - *include* edge `e` only if it joins two components of the chosen forest
//! - *exclude* edge `e` only if chosen + undecided edges stay connected
//!
//! Both rules keep "some spanning tree extends this frame" true, so every
//! frame reaches at least one leaf and no branch is wasted. Two leaves differ
//! in at least one decision, so no tree is produced twice.

use petgraph::unionfind::UnionFind;

use super::{EnumerationError, SpanningTreeEnumerator};
use crate::types::{SimpleGraph, TreeMask, UndirectedEdge, MAX_EDGE_SLOTS};

/// Edge set of one spanning tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpanningTree {
    edges: Vec<UndirectedEdge>,
}

impl SpanningTree {
    /// Edges, sorted.
    pub fn edges(&self) -> &[UndirectedEdge] {
        &self.edges
    }

    /// Number of edges (`n - 1` for `n` vertices).
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the tree has no edges (single-vertex graph).
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl AsRef<[UndirectedEdge]> for SpanningTree {
    fn as_ref(&self) -> &[UndirectedEdge] {
        &self.edges
    }
}

/// Default spanning-tree enumerator.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchingTreeEnumerator;

impl SpanningTreeEnumerator for BranchingTreeEnumerator {
    type Iter<'g> = SpanningTreeIter<'g>;

    fn spanning_trees<'g>(
        &'g self,
        graph: &'g SimpleGraph,
    ) -> Result<SpanningTreeIter<'g>, EnumerationError> {
        SpanningTreeIter::new(graph)
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    next: usize,
    chosen: TreeMask,
    removed: TreeMask,
}

/// Iterator over the spanning trees of one graph.
#[derive(Debug, Clone)]
pub struct SpanningTreeIter<'g> {
    edges: &'g [UndirectedEdge],
    vertex_count: usize,
    stack: Vec<Frame>,
}

impl<'g> SpanningTreeIter<'g> {
    /// Start enumerating `graph`.
    ///
    /// Disconnected graphs, including the empty graph, yield nothing. A single
    /// vertex yields one empty tree.
    pub fn new(graph: &'g SimpleGraph) -> Result<Self, EnumerationError> {
        if graph.edge_count() > MAX_EDGE_SLOTS {
            return Err(EnumerationError::TooManyEdges {
                edges: graph.edge_count(),
                max: MAX_EDGE_SLOTS,
            });
        }
        let mut stack = Vec::with_capacity(graph.edge_count() + 1);
        if graph.is_connected() {
            stack.push(Frame {
                next: 0,
                chosen: TreeMask::EMPTY,
                removed: TreeMask::EMPTY,
            });
        }
        Ok(Self {
            edges: graph.edges(),
            vertex_count: graph.vertex_count(),
            stack,
        })
    }

    fn components(&self, mask: TreeMask) -> UnionFind<usize> {
        let mut uf = UnionFind::new(self.vertex_count);
        for slot in mask.slots() {
            let e = self.edges[slot];
            uf.union(e.u, e.v);
        }
        uf
    }

    fn is_spanning(&self, mask: TreeMask) -> bool {
        let mut uf = UnionFind::new(self.vertex_count);
        let mut merges = 0;
        for slot in mask.slots() {
            let e = self.edges[slot];
            if uf.union(e.u, e.v) {
                merges += 1;
            }
        }
        merges + 1 == self.vertex_count
    }
}

impl Iterator for SpanningTreeIter<'_> {
    type Item = SpanningTree;

    fn next(&mut self) -> Option<SpanningTree> {
        let tree_size = self.vertex_count.saturating_sub(1);
        let all = TreeMask::full(self.edges.len());

        while let Some(frame) = self.stack.pop() {
            if frame.chosen.len() == tree_size {
                return Some(SpanningTree {
                    edges: frame.chosen.slots().map(|slot| self.edges[slot]).collect(),
                });
            }
            let Some(edge) = self.edges.get(frame.next) else {
                continue;
            };
            let bit = TreeMask::singleton(frame.next);

            // Pushed first so the include branch is explored first
            let kept = TreeMask::new(all.bits() & !frame.removed.bits() & !bit.bits());
            if self.is_spanning(kept) {
                self.stack.push(Frame {
                    next: frame.next + 1,
                    chosen: frame.chosen,
                    removed: TreeMask::new(frame.removed.bits() | bit.bits()),
                });
            }
            if !self.components(frame.chosen).equiv(edge.u, edge.v) {
                self.stack.push(Frame {
                    next: frame.next + 1,
                    chosen: TreeMask::new(frame.chosen.bits() | bit.bits()),
                    removed: frame.removed,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solids::PlatonicSolid;
    use std::collections::HashSet;

    fn trees(graph: &SimpleGraph) -> Vec<SpanningTree> {
        BranchingTreeEnumerator.spanning_trees(graph).unwrap().collect()
    }

    #[test]
    fn test_path_has_one_tree() {
        let graph = SimpleGraph::path(3);
        let all = trees(&graph);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].edges(), graph.edges());
    }

    #[test]
    fn test_cycle_trees_drop_one_edge() {
        let all = trees(&SimpleGraph::cycle(4));
        assert_eq!(all.len(), 4);
        assert!(all.iter().all(|t| t.len() == 3));
    }

    #[test]
    fn test_counts_match_cayley_and_solids() {
        assert_eq!(trees(&SimpleGraph::complete(4)).len(), 16);
        assert_eq!(trees(&SimpleGraph::complete(5)).len(), 125);
        assert_eq!(trees(&PlatonicSolid::Cube.graph()).len(), 384);
        assert_eq!(trees(&PlatonicSolid::Octahedron.graph()).len(), 384);
    }

    #[test]
    fn test_no_duplicates_and_all_spanning() {
        let graph = PlatonicSolid::Cube.graph();
        let all = trees(&graph);
        let distinct: HashSet<_> = all.iter().collect();
        assert_eq!(distinct.len(), all.len());
        for tree in &all {
            let sub = SimpleGraph::from_edges(graph.vertex_count(), tree.edges().iter().copied()).unwrap();
            assert!(sub.is_connected());
            assert_eq!(sub.edge_count(), graph.vertex_count() - 1);
        }
    }

    #[test]
    fn test_degenerate_graphs() {
        assert!(trees(&SimpleGraph::empty(0)).is_empty());
        assert!(trees(&SimpleGraph::empty(3)).is_empty());
        let split = SimpleGraph::from_edges(4, [(0, 1), (2, 3)]).unwrap();
        assert!(trees(&split).is_empty());

        let single = trees(&SimpleGraph::empty(1));
        assert_eq!(single.len(), 1);
        assert!(single[0].is_empty());
    }

    #[test]
    fn test_too_many_edges() {
        let graph = SimpleGraph::complete(17);
        assert!(matches!(
            BranchingTreeEnumerator.spanning_trees(&graph),
            Err(EnumerationError::TooManyEdges { edges: 136, .. })
        ));
    }
}
