//! Spanning-tree symmetry classes CLI
//!
//! Counts spanning trees of the Platonic solids up to symmetry, cross-checks
//! tree counts with Kirchhoff's theorem, and prints automorphism groups.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default: tree_classes=info,platonic_trees=info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for terminals (default: pretty)
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin tree_classes -- classes --solid cube
//! cargo run --release --bin tree_classes -- kirchhoff --all --float
//! cargo run --release --bin tree_classes -- automorphisms
//! cargo run --release --bin tree_classes -- automorphisms --adjacency '[[1],[],[]]'
//! ```

use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use platonic_trees::enumerate::{automorphisms_from_matrix, DEFAULT_BRUTE_FORCE_LIMIT};
use platonic_trees::{
    adjacency_matrix, cofactor_counts, laplacian_from_list, sample_tree, verified_tree_count,
    AutomorphismBackend, DeterminantStrategy, PlatonicSolid, RunConfig, SimpleGraph,
    TreeClassPipeline,
};

#[derive(Parser)]
#[command(name = "tree_classes")]
#[command(author, version, about = "Count spanning trees of Platonic solids up to symmetry")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count spanning trees and their symmetry classes
    Classes {
        #[command(flatten)]
        target: Target,

        /// Print reports as JSON
        #[arg(long)]
        json: bool,

        /// Canonicalize on all cores (needs the `parallel` feature)
        #[arg(long)]
        parallel: bool,

        /// Use exhaustive automorphism search instead of VF2
        #[arg(long)]
        brute_force: bool,

        /// Skip the Kirchhoff cross-check
        #[arg(long)]
        no_verify: bool,
    },

    /// Count spanning trees with the Matrix-Tree theorem
    Kirchhoff {
        #[command(flatten)]
        target: Target,

        /// Use floating-point determinants
        #[arg(long)]
        float: bool,
    },

    /// Compare automorphism groups derived from adjacency and Laplacian
    Automorphisms {
        /// Solid to inspect (default: the 6-vertex sample tree)
        #[arg(long, conflicts_with = "adjacency")]
        solid: Option<PlatonicSolid>,

        /// Adjacency list as JSON, e.g. '[[1],[0,2],[1]]'; need not be symmetric
        #[arg(long)]
        adjacency: Option<String>,

        /// Print every automorphism
        #[arg(long)]
        list: bool,
    },
}

#[derive(Args)]
struct Target {
    /// Solid to process
    #[arg(long, conflicts_with = "all")]
    solid: Option<PlatonicSolid>,

    /// Process every solid
    #[arg(long)]
    all: bool,
}

impl Target {
    fn solids(&self) -> Vec<PlatonicSolid> {
        match self.solid {
            Some(solid) if !self.all => vec![solid],
            _ => PlatonicSolid::ALL.to_vec(),
        }
    }
}

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tree_classes=info,platonic_trees=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn run_classes(
    solids: &[PlatonicSolid],
    config: RunConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(params_hash = %config.params_hash()?, "run configuration");
    let pipeline = TreeClassPipeline::new(config);
    let mut reports = Vec::with_capacity(solids.len());
    for &solid in solids {
        let report = pipeline.run_solid(solid)?;
        if !json {
            println!("{report}\n");
        }
        reports.push(report);
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    Ok(())
}

fn run_kirchhoff(
    solids: &[PlatonicSolid],
    strategy: DeterminantStrategy,
) -> Result<(), Box<dyn std::error::Error>> {
    for &solid in solids {
        let graph = solid.graph();
        let rows: Vec<usize> = (0..3.min(graph.vertex_count())).collect();
        for (row, count) in cofactor_counts(&graph, &rows, strategy)? {
            println!("{solid}: delete row {row} -> {count}");
        }
        let count = verified_tree_count(&graph, rows.len(), strategy)?;
        println!("{solid}: {count} spanning trees\n");
    }
    Ok(())
}

fn adjacency_list(graph: &SimpleGraph) -> Vec<Vec<usize>> {
    (0..graph.vertex_count())
        .map(|v| graph.neighbors(v).collect())
        .collect()
}

/// A comes from the symmetrized graph, L straight from `list`, so an
/// asymmetric list can give different groups.
fn run_automorphisms(
    name: &str,
    list: &[Vec<usize>],
    print_all: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let graph = SimpleGraph::from_adjacency(list)?;
    let l = laplacian_from_list(list)?;
    if !l.is_symmetric() {
        warn!(graph = %name, "adjacency list is not symmetric");
    }
    let from_adjacency = automorphisms_from_matrix(&adjacency_matrix(&graph), DEFAULT_BRUTE_FORCE_LIMIT)?;
    let from_laplacian = automorphisms_from_matrix(&l, DEFAULT_BRUTE_FORCE_LIMIT)?;

    println!("{name}: {} vertices, {} edges", graph.vertex_count(), graph.edge_count());
    println!("  automorphisms from A: {}", from_adjacency.len());
    println!("  automorphisms from L: {}", from_laplacian.len());
    if from_adjacency != from_laplacian {
        warn!(graph = %name, "adjacency and Laplacian groups differ");
    }
    if print_all {
        for automorphism in &from_adjacency {
            println!("  {automorphism}");
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();
    info!(version = env!("CARGO_PKG_VERSION"), "tree_classes starting");

    match cli.command {
        Commands::Classes {
            target,
            json,
            parallel,
            brute_force,
            no_verify,
        } => {
            let config = RunConfig {
                automorphisms: if brute_force {
                    AutomorphismBackend::brute_force()
                } else {
                    AutomorphismBackend::Vf2
                },
                verify_tree_count: !no_verify,
                parallel,
                ..RunConfig::default()
            };
            run_classes(&target.solids(), config, json)
        }
        Commands::Kirchhoff { target, float } => {
            let strategy = if float {
                DeterminantStrategy::float()
            } else {
                DeterminantStrategy::Exact
            };
            run_kirchhoff(&target.solids(), strategy)
        }
        Commands::Automorphisms {
            solid,
            adjacency,
            list,
        } => match (solid, adjacency) {
            (_, Some(json)) => {
                let raw: Vec<Vec<usize>> = serde_json::from_str(&json)?;
                run_automorphisms("adjacency list", &raw, list)
            }
            (Some(solid), None) => run_automorphisms(solid.name(), &adjacency_list(&solid.graph()), list),
            (None, None) => run_automorphisms("sample tree", &adjacency_list(&sample_tree()), list),
        },
    }
}
