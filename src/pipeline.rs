//! End-to-end symmetry-class count for one graph.
//!
//! ## Stages
//!
//! 1. Index the edges of the graph
//! 2. Enumerate the automorphism group
//! 3. Translate every automorphism into an edge permutation
//! 4. Stream spanning trees through the orbit deduplicator
//! 5. Optionally check the tree count against the Matrix-Tree theorem
//!
//! Each stage is timed and logged; the totals land in a [`ClassReport`].

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::canonical::class_fingerprint;
use crate::config::RunConfig;
use crate::edge_index::{build_edge_index, IndexError};
use crate::enumerate::{
    AutomorphismEnumerator, BranchingTreeEnumerator, EnumerationError, SpanningTreeEnumerator,
};
use crate::kirchhoff::{verified_tree_count, KirchhoffError};
use crate::orbit::OrbitDeduplicator;
use crate::permutation::{derive_edge_permutations, PermutationError};
use crate::solids::PlatonicSolid;
use crate::types::{GraphError, SimpleGraph, UndirectedEdge};

/// Error type for a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The input graph could not be built.
    #[error("Invalid graph: {0}")]
    Graph(#[from] GraphError),
    /// Edge indexing failed.
    #[error("Edge index error: {0}")]
    Index(#[from] IndexError),
    /// An enumerator failed.
    #[error("Enumeration error: {0}")]
    Enumeration(#[from] EnumerationError),
    /// Translating or applying a permutation failed.
    #[error("Permutation error: {0}")]
    Permutation(#[from] PermutationError),
    /// The Matrix-Tree count could not be computed.
    #[error("Kirchhoff error: {0}")]
    Kirchhoff(#[from] KirchhoffError),
    /// Fingerprint serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The tree enumerator disagrees with the Matrix-Tree theorem.
    #[error("Enumerated {enumerated} spanning trees but Kirchhoff gives {kirchhoff}")]
    TreeCountMismatch {
        /// Trees produced by the enumerator.
        enumerated: usize,
        /// Matrix-Tree count.
        kirchhoff: u128,
    },
}

/// Wall-clock seconds spent per stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimings {
    /// Edge indexing.
    pub graph_index_secs: f64,
    /// Automorphism enumeration.
    pub automorphisms_secs: f64,
    /// Edge permutation derivation.
    pub edge_permutations_secs: f64,
    /// Tree enumeration with canonicalization and deduplication.
    pub trees_secs: f64,
    /// Matrix-Tree cross-check (zero when skipped).
    pub kirchhoff_secs: f64,
    /// Whole run.
    pub total_secs: f64,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassReport {
    /// [`crate::REPORT_SCHEMA_VERSION`] at the time of the run.
    pub schema_version: String,
    /// Name the graph was run under.
    pub graph: String,
    /// Vertex count.
    pub vertices: usize,
    /// Edge count.
    pub edges: usize,
    /// Order of the automorphism group.
    pub automorphisms: usize,
    /// Spanning trees enumerated.
    pub n_trees: usize,
    /// Symmetry classes of spanning trees.
    pub n_classes: usize,
    /// Matrix-Tree count, if the cross-check ran.
    pub kirchhoff_trees: Option<u128>,
    /// Order-independent hash of the canonical representatives.
    pub class_fingerprint: String,
    /// Hash of the configuration used.
    pub params_hash: String,
    /// Per-stage timings.
    pub timings: StageTimings,
}

impl ClassReport {
    /// Average trees per class, if any class exists.
    pub fn trees_per_class(&self) -> Option<f64> {
        (self.n_classes > 0).then(|| self.n_trees as f64 / self.n_classes as f64)
    }
}

impl fmt::Display for ClassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} vertices, {} edges, |Aut| = {}",
            self.graph, self.vertices, self.edges, self.automorphisms
        )?;
        match self.kirchhoff_trees {
            Some(k) => writeln!(f, "  spanning trees:     {} (Kirchhoff {})", self.n_trees, k)?,
            None => writeln!(f, "  spanning trees:     {}", self.n_trees)?,
        }
        writeln!(f, "  symmetry classes:   {}", self.n_classes)?;
        writeln!(f, "  fingerprint:        {}", self.class_fingerprint)?;
        let t = &self.timings;
        writeln!(f, "  time graph index:   {:.6}s", t.graph_index_secs)?;
        writeln!(f, "  time automorphisms: {:.6}s", t.automorphisms_secs)?;
        writeln!(f, "  time edge perms:    {:.6}s", t.edge_permutations_secs)?;
        writeln!(f, "  time trees+dedup:   {:.6}s", t.trees_secs)?;
        if self.kirchhoff_trees.is_some() {
            writeln!(f, "  time kirchhoff:     {:.6}s", t.kirchhoff_secs)?;
        }
        write!(f, "  time total:         {:.6}s", t.total_secs)
    }
}

/// Runs the symmetry-class count with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct TreeClassPipeline {
    config: RunConfig,
}

impl TreeClassPipeline {
    /// Create a pipeline.
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run on one of the named solids.
    pub fn run_solid(&self, solid: PlatonicSolid) -> Result<ClassReport, PipelineError> {
        self.run(solid.name(), &solid.graph())
    }

    /// Run on a graph given as an adjacency list.
    pub fn run_adjacency(
        &self,
        name: &str,
        adjacency: &[Vec<usize>],
    ) -> Result<ClassReport, PipelineError> {
        let graph = SimpleGraph::from_adjacency(adjacency)?;
        self.run(name, &graph)
    }

    /// Run with the configured automorphism backend and the default tree
    /// enumerator.
    pub fn run(&self, name: &str, graph: &SimpleGraph) -> Result<ClassReport, PipelineError> {
        self.run_with(name, graph, &self.config.automorphisms, &BranchingTreeEnumerator)
    }

    /// Run with caller-supplied enumerators.
    pub fn run_with<A, T>(
        &self,
        name: &str,
        graph: &SimpleGraph,
        automorphisms: &A,
        trees: &T,
    ) -> Result<ClassReport, PipelineError>
    where
        A: AutomorphismEnumerator + ?Sized,
        T: SpanningTreeEnumerator,
    {
        let span = info_span!("tree_classes", graph = %name);
        let _guard = span.enter();
        let params_hash = self.config.params_hash()?;
        let start = Instant::now();

        let index = build_edge_index(graph)?;
        let graph_index = start.elapsed();
        info!(
            vertices = graph.vertex_count(),
            edges = index.len(),
            elapsed_s = secs(graph_index),
            "indexed graph"
        );

        let stage = Instant::now();
        let group = automorphisms.automorphisms(graph)?;
        let automorphisms_time = stage.elapsed();
        info!(
            automorphisms = group.len(),
            elapsed_s = secs(automorphisms_time),
            "enumerated automorphisms"
        );

        let stage = Instant::now();
        let perms = derive_edge_permutations(&group, &index)?;
        let perms_time = stage.elapsed();
        info!(
            permutations = perms.len(),
            elapsed_s = secs(perms_time),
            "derived edge permutations"
        );

        let stage = Instant::now();
        let mut dedup = OrbitDeduplicator::new(&index, &perms)?;
        let tree_iter = trees.spanning_trees(graph)?;
        self.deduplicate(&mut dedup, tree_iter)?;
        let trees_time = stage.elapsed();
        let count = dedup.count();
        info!(
            n_trees = count.n_trees,
            n_classes = count.n_classes,
            elapsed_s = secs(trees_time),
            "canonicalized spanning trees"
        );

        let stage = Instant::now();
        let kirchhoff_trees = self.cross_check(graph, count.n_trees)?;
        let kirchhoff_time = if kirchhoff_trees.is_some() {
            stage.elapsed()
        } else {
            Duration::ZERO
        };

        let class_fingerprint = class_fingerprint(&dedup.representatives())?;
        let total = start.elapsed();
        info!(total_s = secs(total), fingerprint = %class_fingerprint, "run complete");

        Ok(ClassReport {
            schema_version: crate::REPORT_SCHEMA_VERSION.to_string(),
            graph: name.to_string(),
            vertices: graph.vertex_count(),
            edges: index.len(),
            automorphisms: group.len(),
            n_trees: count.n_trees,
            n_classes: count.n_classes,
            kirchhoff_trees,
            class_fingerprint,
            params_hash,
            timings: StageTimings {
                graph_index_secs: secs(graph_index),
                automorphisms_secs: secs(automorphisms_time),
                edge_permutations_secs: secs(perms_time),
                trees_secs: secs(trees_time),
                kirchhoff_secs: secs(kirchhoff_time),
                total_secs: secs(total),
            },
        })
    }

    fn deduplicate<I>(&self, dedup: &mut OrbitDeduplicator<'_>, trees: I) -> Result<(), PermutationError>
    where
        I: Iterator,
        I::Item: AsRef<[UndirectedEdge]>,
    {
        if self.config.runs_parallel() {
            #[cfg(feature = "parallel")]
            return dedup.extend_par(trees);
        }
        if self.config.parallel && !cfg!(feature = "parallel") {
            warn!("parallel canonicalization requested without the `parallel` feature, running sequentially");
        }
        dedup.extend_trees(trees)
    }

    /// Matrix-Tree count, or `None` when the check is off or the graph is empty.
    fn cross_check(&self, graph: &SimpleGraph, enumerated: usize) -> Result<Option<u128>, PipelineError> {
        if !self.config.verify_tree_count {
            return Ok(None);
        }
        if graph.vertex_count() == 0 {
            debug!("empty graph, skipping Kirchhoff check");
            return Ok(None);
        }
        let kirchhoff = verified_tree_count(graph, self.config.cofactor_checks, self.config.determinant)?;
        if kirchhoff != enumerated as u128 {
            return Err(PipelineError::TreeCountMismatch { enumerated, kirchhoff });
        }
        debug!(kirchhoff = %kirchhoff, "tree count confirmed");
        Ok(Some(kirchhoff))
    }
}

fn secs(d: Duration) -> f64 {
    d.as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AutomorphismBackend;
    use crate::enumerate::SpanningTreeIter;
    use crate::types::Automorphism;

    fn run(graph: &SimpleGraph) -> ClassReport {
        TreeClassPipeline::default().run("test", graph).unwrap()
    }

    #[test]
    fn test_small_graphs() {
        let p3 = run(&SimpleGraph::path(3));
        assert_eq!((p3.automorphisms, p3.n_trees, p3.n_classes), (2, 1, 1));

        let c4 = run(&SimpleGraph::cycle(4));
        assert_eq!((c4.automorphisms, c4.n_trees, c4.n_classes), (8, 4, 1));
        assert_eq!(c4.kirchhoff_trees, Some(4));

        let k4 = run(&SimpleGraph::complete(4));
        assert_eq!((k4.automorphisms, k4.n_trees, k4.n_classes), (24, 16, 2));
    }

    #[test]
    fn test_cube() {
        let report = TreeClassPipeline::default().run_solid(PlatonicSolid::Cube).unwrap();
        assert_eq!(report.graph, "cube");
        assert_eq!(report.automorphisms, 48);
        assert_eq!(report.n_trees, 384);
        assert_eq!(report.n_classes, 11);
        assert!(report.timings.total_secs >= report.timings.trees_secs);
    }

    #[test]
    fn test_degenerate_graphs() {
        let empty = run(&SimpleGraph::empty(0));
        assert_eq!((empty.n_trees, empty.n_classes, empty.kirchhoff_trees), (0, 0, None));

        let split = run(&SimpleGraph::from_edges(4, [(0, 1), (2, 3)]).unwrap());
        assert_eq!((split.n_trees, split.n_classes), (0, 0));
        assert_eq!(split.kirchhoff_trees, Some(0));

        let single = run(&SimpleGraph::empty(1));
        assert_eq!((single.n_trees, single.n_classes), (1, 1));
    }

    #[test]
    fn test_trivial_group_counts_every_tree() {
        struct IdentityOnly;
        impl AutomorphismEnumerator for IdentityOnly {
            fn automorphisms(&self, graph: &SimpleGraph) -> Result<Vec<Automorphism>, EnumerationError> {
                Ok(vec![Automorphism::identity(graph.vertex_count())])
            }
        }
        let report = TreeClassPipeline::default()
            .run_with("k4", &SimpleGraph::complete(4), &IdentityOnly, &BranchingTreeEnumerator)
            .unwrap();
        assert_eq!(report.n_classes, report.n_trees);
    }

    #[test]
    fn test_broken_tree_enumerator_is_caught() {
        /// Drops the first tree.
        struct Lossy;
        impl SpanningTreeEnumerator for Lossy {
            type Iter<'g> = std::iter::Skip<SpanningTreeIter<'g>>;
            fn spanning_trees<'g>(&'g self, graph: &'g SimpleGraph) -> Result<Self::Iter<'g>, EnumerationError> {
                Ok(SpanningTreeIter::new(graph)?.skip(1))
            }
        }
        let err = TreeClassPipeline::default()
            .run_with("c4", &SimpleGraph::cycle(4), &AutomorphismBackend::Vf2, &Lossy)
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::TreeCountMismatch { enumerated: 3, kirchhoff: 4 }
        ));
    }

    #[test]
    fn test_skip_verification() {
        let config = RunConfig {
            verify_tree_count: false,
            ..RunConfig::default()
        };
        let report = TreeClassPipeline::new(config).run("c5", &SimpleGraph::cycle(5)).unwrap();
        assert_eq!(report.kirchhoff_trees, None);
        assert_eq!(report.timings.kirchhoff_secs, 0.0);
        assert_eq!(report.n_classes, 1);
    }

    #[test]
    fn test_backends_agree() {
        let graph = SimpleGraph::complete(5);
        let vf2 = TreeClassPipeline::default().run("k5", &graph).unwrap();
        let brute = TreeClassPipeline::new(RunConfig {
            automorphisms: AutomorphismBackend::brute_force(),
            ..RunConfig::default()
        })
        .run("k5", &graph)
        .unwrap();
        assert_eq!(vf2.n_classes, brute.n_classes);
        assert_eq!(vf2.class_fingerprint, brute.class_fingerprint);
        assert_ne!(vf2.params_hash, brute.params_hash);
    }

    #[test]
    fn test_invalid_adjacency() {
        let err = TreeClassPipeline::default()
            .run_adjacency("bad", &[vec![0]])
            .unwrap_err();
        assert!(matches!(err, PipelineError::Graph(GraphError::SelfLoop(0))));
    }

    #[test]
    fn test_report_json() {
        let report = run(&SimpleGraph::cycle(4));
        let json = serde_json::to_string(&report).unwrap();
        let back: ClassReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.n_classes, 1);
        assert!(report.to_string().contains("symmetry classes:   1"));
    }
}
