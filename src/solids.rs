//! Skeleton graphs of the Platonic solids.
//!
//! Every constructor returns a fresh value; nothing here is global state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{SimpleGraph, UndirectedEdge};

/// The five Platonic solids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatonicSolid {
    /// 4 vertices, 6 edges (`K_4`).
    Tetrahedron,
    /// 8 vertices, 12 edges.
    Cube,
    /// 6 vertices, 12 edges.
    Octahedron,
    /// 20 vertices, 30 edges.
    Dodecahedron,
    /// 12 vertices, 30 edges.
    Icosahedron,
}

impl PlatonicSolid {
    /// All solids, smallest first.
    pub const ALL: [PlatonicSolid; 5] = [
        Self::Tetrahedron,
        Self::Cube,
        Self::Octahedron,
        Self::Dodecahedron,
        Self::Icosahedron,
    ];

    /// Lower-case name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tetrahedron => "tetrahedron",
            Self::Cube => "cube",
            Self::Octahedron => "octahedron",
            Self::Dodecahedron => "dodecahedron",
            Self::Icosahedron => "icosahedron",
        }
    }

    /// Build the skeleton graph.
    pub fn graph(&self) -> SimpleGraph {
        match self {
            Self::Tetrahedron => SimpleGraph::complete(4),
            Self::Cube => cube(),
            Self::Octahedron => octahedron(),
            Self::Dodecahedron => dodecahedron(),
            Self::Icosahedron => icosahedron(),
        }
    }
}

impl fmt::Display for PlatonicSolid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a solid name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown solid: {0}")]
pub struct UnknownSolid(pub String);

impl FromStr for PlatonicSolid {
    type Err = UnknownSolid;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|solid| solid.name() == name)
            .ok_or(UnknownSolid(s.to_string()))
    }
}

/// Icosahedron adjacency: opposite vertices are `2k` and `2k + 1`.
const ICOSAHEDRON_ADJACENCY: [[usize; 5]; 12] = [
    [2, 4, 6, 8, 10],
    [3, 4, 6, 9, 11],
    [0, 5, 7, 8, 10],
    [1, 5, 7, 9, 11],
    [0, 1, 6, 8, 9],
    [2, 3, 7, 8, 9],
    [0, 1, 4, 10, 11],
    [2, 3, 5, 10, 11],
    [0, 2, 4, 5, 9],
    [1, 3, 4, 5, 8],
    [0, 2, 6, 7, 11],
    [1, 3, 6, 7, 10],
];

/// LCF notation `[10, 7, 4, -4, -7, 10, -4, 7, -7, 4]^2` for the dodecahedron.
const DODECAHEDRON_LCF: [isize; 10] = [10, 7, 4, -4, -7, 10, -4, 7, -7, 4];

fn icosahedron() -> SimpleGraph {
    from_known_edges(
        12,
        ICOSAHEDRON_ADJACENCY
            .iter()
            .enumerate()
            .flat_map(|(u, row)| row.iter().map(move |&v| UndirectedEdge::new(u, v))),
    )
}

/// Vertices are 3-bit words, adjacent when they differ in one bit.
fn cube() -> SimpleGraph {
    from_known_edges(
        8,
        (0..8usize).flat_map(|u| [1, 2, 4].into_iter().map(move |bit| UndirectedEdge::new(u, u ^ bit))),
    )
}

/// `K_{2,2,2}`: every vertex except its antipode `v ^ 1`.
fn octahedron() -> SimpleGraph {
    from_known_edges(
        6,
        (0..6usize).flat_map(|u| {
            (0..6usize)
                .filter(move |&v| v != u && v != u ^ 1)
                .map(move |v| UndirectedEdge::new(u, v))
        }),
    )
}

fn dodecahedron() -> SimpleGraph {
    const N: usize = 20;
    let ring = (0..N).map(|i| UndirectedEdge::new(i, (i + 1) % N));
    let chords = (0..N).map(|i| {
        let shift = DODECAHEDRON_LCF[i % DODECAHEDRON_LCF.len()];
        let j = (i as isize + shift).rem_euclid(N as isize) as usize;
        UndirectedEdge::new(i, j)
    });
    from_known_edges(N, ring.chain(chords))
}

/// Edge lists above are constant; an invalid entry is a bug in this file.
fn from_known_edges(n: usize, edges: impl Iterator<Item = UndirectedEdge>) -> SimpleGraph {
    let mut graph = SimpleGraph::empty(n);
    for edge in edges {
        let added = graph.add_edge(edge.u, edge.v);
        debug_assert!(added.is_ok(), "invalid built-in edge {edge}: {added:?}");
    }
    graph
}

/// Six-vertex sample tree: a hub `1` with leaves `0, 2, 3` and a tail `4 - 5`.
///
/// Its automorphism group permutes the three leaves (order 6).
pub fn sample_tree() -> SimpleGraph {
    from_known_edges(
        6,
        [(0, 1), (1, 2), (1, 3), (1, 4), (4, 5)]
            .into_iter()
            .map(UndirectedEdge::from),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_sizes_and_regularity() {
        let expected = [
            (PlatonicSolid::Tetrahedron, 4, 6, 3),
            (PlatonicSolid::Cube, 8, 12, 3),
            (PlatonicSolid::Octahedron, 6, 12, 4),
            (PlatonicSolid::Dodecahedron, 20, 30, 3),
            (PlatonicSolid::Icosahedron, 12, 30, 5),
        ];
        for (solid, n, m, degree) in expected {
            let graph = solid.graph();
            assert_eq!(graph.vertex_count(), n, "{solid}");
            assert_eq!(graph.edge_count(), m, "{solid}");
            assert!(graph.is_connected(), "{solid}");
            for v in 0..n {
                assert_eq!(graph.degree(v), degree, "{solid} vertex {v}");
            }
        }
    }

    #[test]
    fn test_built_in_tables_are_consistent() {
        for (u, row) in ICOSAHEDRON_ADJACENCY.iter().enumerate() {
            for &v in row {
                assert!(v < 12 && v != u, "icosahedron entry {u} -> {v}");
                assert!(ICOSAHEDRON_ADJACENCY[v].contains(&u), "icosahedron {v} misses {u}");
            }
        }
        // Every LCF chord must be answered by the chord at its far end
        for i in 0..20isize {
            let shift = DODECAHEDRON_LCF[i as usize % DODECAHEDRON_LCF.len()];
            let j = (i + shift).rem_euclid(20);
            let back = DODECAHEDRON_LCF[j as usize % DODECAHEDRON_LCF.len()];
            assert_eq!((j + back).rem_euclid(20), i, "dodecahedron chord {i} -> {j}");
        }
    }

    #[test]
    fn test_every_solid_rebuilds_from_its_edges() {
        for solid in PlatonicSolid::ALL {
            let graph = solid.graph();
            let rebuilt = SimpleGraph::from_edges(graph.vertex_count(), graph.edges().iter().copied());
            assert_eq!(rebuilt.as_ref(), Ok(&graph), "{solid}");
        }
    }

    #[test]
    fn test_parse_names() {
        for solid in PlatonicSolid::ALL {
            assert_eq!(solid.name().parse::<PlatonicSolid>().unwrap(), solid);
        }
        assert_eq!(" Cube ".parse::<PlatonicSolid>().unwrap(), PlatonicSolid::Cube);
        assert!("torus".parse::<PlatonicSolid>().is_err());
    }

    #[test]
    fn test_sample_tree() {
        let graph = sample_tree();
        assert_eq!(graph.edge_count(), 5);
        assert_eq!(graph.degree(1), 4);
        assert!(graph.is_connected());
    }
}
