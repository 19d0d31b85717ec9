//! Exhaustive automorphism search by conjugation.
//!
//! Tries all `n!` vertex permutations `p` and keeps those with `P M P^T == M`.
//! Only usable for small graphs, so it refuses anything above a vertex limit.

use super::{finish_group, AutomorphismEnumerator, EnumerationError};
use crate::laplacian::{adjacency_matrix, IntMatrix};
use crate::types::{Automorphism, SimpleGraph};

/// Default vertex limit (9! = 362,880 permutations).
pub const DEFAULT_BRUTE_FORCE_LIMIT: usize = 9;

/// Brute-force automorphism enumerator over the adjacency matrix.
#[derive(Debug, Clone, Copy)]
pub struct BruteForceAutomorphisms {
    /// Largest vertex count accepted.
    pub max_vertices: usize,
}

impl BruteForceAutomorphisms {
    /// Enumerator with an explicit vertex limit.
    pub fn new(max_vertices: usize) -> Self {
        Self { max_vertices }
    }
}

impl Default for BruteForceAutomorphisms {
    fn default() -> Self {
        Self::new(DEFAULT_BRUTE_FORCE_LIMIT)
    }
}

impl AutomorphismEnumerator for BruteForceAutomorphisms {
    fn automorphisms(&self, graph: &SimpleGraph) -> Result<Vec<Automorphism>, EnumerationError> {
        let group = automorphisms_from_matrix(&adjacency_matrix(graph), self.max_vertices)?;
        finish_group(graph, group)
    }
}

/// Every permutation fixing `matrix` under conjugation, sorted.
///
/// Works for any square matrix, so the adjacency and Laplacian groups can be
/// compared directly.
pub fn automorphisms_from_matrix(
    matrix: &IntMatrix,
    limit: usize,
) -> Result<Vec<Automorphism>, EnumerationError> {
    let n = matrix.size();
    if n > limit {
        return Err(EnumerationError::BruteForceLimit { vertices: n, limit });
    }
    tracing::debug!(vertices = n, "brute-force automorphism search");

    let mut found = Vec::new();
    for_each_permutation(n, |perm| {
        if matrix.is_fixed_by(perm) {
            found.push(Automorphism::new(perm.to_vec()));
        }
    });
    found.sort_unstable();
    Ok(found)
}

/// Heap's algorithm: visit every permutation of `0..n` once.
fn for_each_permutation(n: usize, mut visit: impl FnMut(&[usize])) {
    let mut perm: Vec<usize> = (0..n).collect();
    let mut counters = vec![0usize; n];
    visit(&perm);

    let mut i = 1;
    while i < n {
        if counters[i] < i {
            if i % 2 == 0 {
                perm.swap(0, i);
            } else {
                perm.swap(counters[i], i);
            }
            visit(&perm);
            counters[i] += 1;
            i = 1;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerate::Vf2Automorphisms;
    use crate::laplacian::laplacian;
    use crate::solids::{sample_tree, PlatonicSolid};
    use std::collections::HashSet;

    #[test]
    fn test_heap_visits_all_permutations() {
        let mut seen = HashSet::new();
        for_each_permutation(4, |p| {
            seen.insert(p.to_vec());
        });
        assert_eq!(seen.len(), 24);

        let mut count = 0;
        for_each_permutation(0, |_| count += 1);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_adjacency_and_laplacian_agree() {
        let graph = sample_tree();
        let from_a = automorphisms_from_matrix(&adjacency_matrix(&graph), 9).unwrap();
        let from_l = automorphisms_from_matrix(&laplacian(&graph), 9).unwrap();
        assert_eq!(from_a.len(), 6);
        assert_eq!(from_a, from_l);
    }

    #[test]
    fn test_matches_vf2() {
        for graph in [
            PlatonicSolid::Tetrahedron.graph(),
            PlatonicSolid::Octahedron.graph(),
            PlatonicSolid::Cube.graph(),
            SimpleGraph::cycle(6),
        ] {
            let brute = BruteForceAutomorphisms::default().automorphisms(&graph).unwrap();
            let vf2 = Vf2Automorphisms.automorphisms(&graph).unwrap();
            assert_eq!(brute, vf2);
        }
    }

    #[test]
    fn test_limit_guard() {
        let graph = PlatonicSolid::Icosahedron.graph();
        let err = BruteForceAutomorphisms::default().automorphisms(&graph).unwrap_err();
        assert_eq!(err, EnumerationError::BruteForceLimit { vertices: 12, limit: 9 });
    }
}
