//! Run configuration.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::enumerate::{
    AutomorphismEnumerator, BruteForceAutomorphisms, EnumerationError, Vf2Automorphisms,
    DEFAULT_BRUTE_FORCE_LIMIT,
};
use crate::kirchhoff::DeterminantStrategy;
use crate::types::{Automorphism, SimpleGraph};

/// Default number of Laplacian cofactors compared per graph.
pub const DEFAULT_COFACTOR_CHECKS: usize = 3;

/// Which automorphism enumerator to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AutomorphismBackend {
    /// petgraph VF2 self-matching.
    Vf2,
    /// Exhaustive permutation search, bounded by a vertex limit.
    BruteForce {
        /// Largest vertex count accepted.
        max_vertices: usize,
    },
}

impl AutomorphismBackend {
    /// Brute force with [`DEFAULT_BRUTE_FORCE_LIMIT`].
    pub fn brute_force() -> Self {
        Self::BruteForce {
            max_vertices: DEFAULT_BRUTE_FORCE_LIMIT,
        }
    }
}

impl Default for AutomorphismBackend {
    fn default() -> Self {
        Self::Vf2
    }
}

impl AutomorphismEnumerator for AutomorphismBackend {
    fn automorphisms(&self, graph: &SimpleGraph) -> Result<Vec<Automorphism>, EnumerationError> {
        match *self {
            Self::Vf2 => Vf2Automorphisms.automorphisms(graph),
            Self::BruteForce { max_vertices } => {
                BruteForceAutomorphisms::new(max_vertices).automorphisms(graph)
            }
        }
    }
}

/// Configuration for one pipeline run.
///
/// ## Parameters
///
/// - `automorphisms`: enumerator backend
/// - `determinant`: how Kirchhoff cofactors are evaluated
/// - `verify_tree_count`: compare the enumerated tree count with Kirchhoff
/// - `cofactor_checks`: how many cofactors must agree
/// - `parallel`: canonicalize on a rayon pool (needs the `parallel` feature)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Automorphism enumerator.
    pub automorphisms: AutomorphismBackend,
    /// Cofactor determinant strategy.
    pub determinant: DeterminantStrategy,
    /// Cross-check n_trees against the Matrix-Tree count.
    pub verify_tree_count: bool,
    /// Number of cofactors compared.
    pub cofactor_checks: usize,
    /// Parallel canonicalization.
    pub parallel: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            automorphisms: AutomorphismBackend::default(),
            determinant: DeterminantStrategy::default(),
            verify_tree_count: true,
            cofactor_checks: DEFAULT_COFACTOR_CHECKS,
            parallel: false,
        }
    }
}

impl RunConfig {
    /// Stable hash of the configuration.
    pub fn params_hash(&self) -> Result<String, serde_json::Error> {
        canonical_hash_hex(self)
    }

    /// Whether parallel canonicalization will actually run.
    pub fn runs_parallel(&self) -> bool {
        self.parallel && cfg!(feature = "parallel")
    }
}
