//! # platonic-trees
//!
//! Spanning trees of small symmetric graphs, counted up to symmetry.
//!
//! Two spanning trees of a graph are equivalent when some automorphism of the
//! graph maps one onto the other. This crate counts those classes for the
//! Platonic-solid graphs (and any other graph with at most 128 edges).
//!
//! ## Core Contract
//!
//! 1. Every edge gets a fixed slot, so an edge subset is a bitmask
//! 2. Every automorphism becomes a permutation of slots
//! 3. The canonical form of a tree is the smallest mask in its orbit
//! 4. The number of classes is the number of distinct canonical forms
//!
//! ## Architecture
//!
//! ```text
//! SimpleGraph → EdgeIndex ──────────────┐
//!      │                                ↓
//!      ├→ AutomorphismEnumerator → EdgePermutation*
//!      │                                ↓
//!      └→ SpanningTreeEnumerator → OrbitDeduplicator → ClassReport
//!                                                        ↑
//!                                   Kirchhoff count ─────┘
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Slot order is the sorted order of normalized edges
//! - Canonical forms do not depend on the order of the automorphism list
//! - The class fingerprint does not depend on tree enumeration order

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod solids;
pub mod edge_index;
pub mod permutation;
pub mod orbit;
pub mod enumerate;
pub mod laplacian;
pub mod kirchhoff;
pub mod canonical;
pub mod config;
pub mod pipeline;

// Re-exports
pub use types::{Automorphism, GraphError, SimpleGraph, TreeMask, UndirectedEdge, MAX_EDGE_SLOTS};
pub use solids::{sample_tree, PlatonicSolid, UnknownSolid};
pub use edge_index::{build_edge_index, EdgeIndex, IndexError};
pub use permutation::{apply_permutation, derive_edge_permutations, EdgePermutation, PermutationError};
pub use orbit::{canonicalize, count_equivalence_classes, orbit, ClassCount, OrbitDeduplicator};
#[cfg(feature = "parallel")]
pub use orbit::count_equivalence_classes_par;
pub use enumerate::{
    AutomorphismEnumerator, BranchingTreeEnumerator, BruteForceAutomorphisms, EnumerationError,
    SpanningTree, SpanningTreeEnumerator, Vf2Automorphisms,
};
pub use laplacian::{adjacency_matrix, laplacian, laplacian_from_list, IntMatrix, MatrixError};
pub use kirchhoff::{
    cofactor_counts, spanning_tree_count, verified_tree_count, DeterminantStrategy, KirchhoffError,
};
pub use canonical::{canonical_hash, canonical_hash_hex, class_fingerprint, to_canonical_bytes};
pub use config::{AutomorphismBackend, RunConfig};
pub use pipeline::{ClassReport, PipelineError, StageTimings, TreeClassPipeline};

/// Schema version of [`ClassReport`] and [`RunConfig`].
/// Increment on breaking changes to either.
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";
