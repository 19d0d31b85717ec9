//! Automorphisms via petgraph's VF2 matcher.

use petgraph::algo::subgraph_isomorphisms_iter;

use super::{finish_group, AutomorphismEnumerator, EnumerationError};
use crate::types::{Automorphism, SimpleGraph};

/// Matches the graph against itself with VF2.
///
/// With both sides equal in size, every induced-subgraph isomorphism VF2
/// reports is a full automorphism.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vf2Automorphisms;

impl AutomorphismEnumerator for Vf2Automorphisms {
    fn automorphisms(&self, graph: &SimpleGraph) -> Result<Vec<Automorphism>, EnumerationError> {
        if graph.vertex_count() == 0 {
            return Ok(vec![Automorphism::identity(0)]);
        }

        let pg = graph.to_petgraph();
        let pg_ref = &pg;
        let mut node_match = |_: &(), _: &()| true;
        let mut edge_match = |_: &(), _: &()| true;

        let group: Vec<Automorphism> =
            match subgraph_isomorphisms_iter(&pg_ref, &pg_ref, &mut node_match, &mut edge_match) {
                Some(mappings) => mappings.map(Automorphism::new).collect(),
                None => Vec::new(),
            };

        tracing::debug!(
            vertices = graph.vertex_count(),
            automorphisms = group.len(),
            "vf2 self-isomorphisms"
        );
        finish_group(graph, group)
    }
}
