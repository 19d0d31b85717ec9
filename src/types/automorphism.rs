//! Vertex automorphisms.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::graph::SimpleGraph;

/// A vertex bijection, `image[v]` is where `v` goes.
///
/// Construction does not check adjacency preservation; use
/// [`Automorphism::preserves`] for that. Orders by image vector so sets of
/// automorphisms sort deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Automorphism(Vec<usize>);

impl Automorphism {
    /// Wrap an image vector.
    pub fn new(image: Vec<usize>) -> Self {
        Self(image)
    }

    /// Identity on `n` vertices.
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// Number of vertices acted on.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this acts on zero vertices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Image of `v`, or `None` if `v` is outside the domain.
    pub fn apply(&self, v: usize) -> Option<usize> {
        self.0.get(v).copied()
    }

    /// Image vector.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Whether this is the identity.
    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &v)| i == v)
    }

    /// Whether the image vector is a bijection on `0..len`.
    pub fn is_bijection(&self) -> bool {
        let mut seen = vec![false; self.0.len()];
        for &v in &self.0 {
            match seen.get_mut(v) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }

    /// Whether this is an automorphism of `graph`: a bijection on its vertex
    /// set with `{u, v}` an edge iff `{φ(u), φ(v)}` is an edge.
    ///
    /// A bijection maps the edge set injectively, so checking that every
    /// edge lands on an edge is enough.
    pub fn preserves(&self, graph: &SimpleGraph) -> bool {
        self.0.len() == graph.vertex_count()
            && self.is_bijection()
            && graph
                .edges()
                .iter()
                .all(|e| graph.has_edge(self.0[e.u], self.0[e.v]))
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    ///
    /// Returns `None` if the domains differ or an image is out of range.
    pub fn compose(&self, other: &Automorphism) -> Option<Automorphism> {
        if self.0.len() != other.0.len() {
            return None;
        }
        other
            .0
            .iter()
            .map(|&v| self.0.get(v).copied())
            .collect::<Option<Vec<_>>>()
            .map(Automorphism)
    }

    /// Inverse bijection, or `None` if this is not a bijection.
    pub fn inverse(&self) -> Option<Automorphism> {
        if !self.is_bijection() {
            return None;
        }
        let mut inverse = vec![0; self.0.len()];
        for (i, &v) in self.0.iter().enumerate() {
            inverse[v] = i;
        }
        Some(Automorphism(inverse))
    }
}

impl From<Vec<usize>> for Automorphism {
    fn from(image: Vec<usize>) -> Self {
        Self(image)
    }
}

impl fmt::Display for Automorphism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, ")")
    }
}
