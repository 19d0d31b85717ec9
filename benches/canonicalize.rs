//! Performance benchmarks for the orbit pipeline.
//!
//! Run with: `cargo bench --bench canonicalize`
//!
//! ## What is measured
//!
//! | Operation | Input | Notes |
//! |-----------|-------|-------|
//! | Permutation apply | one tree mask | cost per set bit |
//! | Canonicalize | one tree mask | one apply per automorphism |
//! | Full pipeline | cube, octahedron | 384 trees each |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use platonic_trees::{
    apply_permutation, build_edge_index, canonicalize, derive_edge_permutations,
    AutomorphismEnumerator, BranchingTreeEnumerator, EdgePermutation, PlatonicSolid, RunConfig,
    SpanningTreeEnumerator, TreeClassPipeline, TreeMask, Vf2Automorphisms,
};

/// Edge permutations and every spanning-tree mask of `solid`.
fn prepare(solid: PlatonicSolid, max_trees: usize) -> (Vec<EdgePermutation>, Vec<TreeMask>) {
    let graph = solid.graph();
    let index = build_edge_index(&graph).unwrap();
    let group = Vf2Automorphisms.automorphisms(&graph).unwrap();
    let perms = derive_edge_permutations(&group, &index).unwrap();
    let masks = BranchingTreeEnumerator
        .spanning_trees(&graph)
        .unwrap()
        .take(max_trees)
        .map(|tree| index.mask_of(tree.edges().iter().copied()).unwrap())
        .collect();
    (perms, masks)
}

fn bench_apply_permutation(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_permutation");

    for solid in [PlatonicSolid::Cube, PlatonicSolid::Icosahedron] {
        let (perms, masks) = prepare(solid, 1);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(solid), &(perms, masks), |b, (perms, masks)| {
            b.iter(|| apply_permutation(black_box(masks[0]), black_box(&perms[1])))
        });
    }

    group.finish();
}

fn bench_canonicalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonicalize");

    for solid in PlatonicSolid::ALL {
        let (perms, masks) = prepare(solid, 1024);
        group.throughput(Throughput::Elements(masks.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(solid), &(perms, masks), |b, (perms, masks)| {
            b.iter(|| {
                masks
                    .iter()
                    .map(|&mask| canonicalize(black_box(mask), perms))
                    .max()
            })
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(20);

    let pipeline = TreeClassPipeline::new(RunConfig {
        verify_tree_count: false,
        ..RunConfig::default()
    });
    for solid in [PlatonicSolid::Tetrahedron, PlatonicSolid::Cube, PlatonicSolid::Octahedron] {
        group.bench_function(BenchmarkId::from_parameter(solid), |b| {
            b.iter(|| pipeline.run_solid(black_box(solid)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_apply_permutation, bench_canonicalize, bench_pipeline);
criterion_main!(benches);
