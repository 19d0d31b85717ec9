//! Edge permutations induced by vertex automorphisms, and their action on masks.
//!
//! ## Group action
//!
//! For an automorphism φ the induced permutation is
//! `perm[i] = slot(φ(u), φ(v))` where `(u, v)` is the edge at slot `i`.
//! Applying `p` and then `q` to a mask equals applying `p.then(&q)`, and
//! `ep(ψ ∘ φ) = ep(φ).then(&ep(ψ))`.

use serde::{Deserialize, Serialize};

use crate::edge_index::{EdgeIndex, IndexError};
use crate::types::{Automorphism, TreeMask, UndirectedEdge, MAX_EDGE_SLOTS};

/// Error type for deriving and applying edge permutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermutationError {
    /// The image of an edge is not an edge of the indexed graph.
    #[error("Malformed automorphism {automorphism}: edge {edge} maps to {image}, which is not an edge")]
    MalformedAutomorphism {
        /// Offending automorphism.
        automorphism: Automorphism,
        /// Source edge.
        edge: UndirectedEdge,
        /// Image of the edge.
        image: UndirectedEdge,
    },
    /// The automorphism does not cover an endpoint of an indexed edge.
    #[error("Malformed automorphism {automorphism}: vertex {vertex} is outside its domain")]
    VertexOutsideDomain {
        /// Offending automorphism.
        automorphism: Automorphism,
        /// Unmapped vertex.
        vertex: usize,
    },
    /// Two edges map to the same slot.
    #[error("Malformed automorphism {automorphism}: induced edge map is not a bijection")]
    NotABijection {
        /// Offending automorphism.
        automorphism: Automorphism,
    },
    /// Permutation and mask (or two permutations) disagree on the slot count.
    #[error("Permutation length mismatch: expected {expected}, found {found}")]
    LengthMismatch {
        /// Expected slot count.
        expected: usize,
        /// Actual slot count.
        found: usize,
    },
    /// A raw image vector is not a bijection on `0..len`.
    #[error("Slot images of length {len} are not a bijection")]
    InvalidImages {
        /// Length of the image vector.
        len: usize,
    },
    /// Mask does not fit the index, or the permutation has more slots than a mask.
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Bijection on edge slots `0..|E|`, with `|E| <= MAX_EDGE_SLOTS`.
///
/// Every constructor (deserialization included) enforces both conditions, so
/// each image is a valid bit position of a [`TreeMask`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct EdgePermutation(Vec<usize>);

impl EdgePermutation {
    /// Identity on `len` slots.
    pub fn identity(len: usize) -> Result<Self, PermutationError> {
        check_capacity(len)?;
        Ok(Self((0..len).collect()))
    }

    /// Wrap a slot image vector, rejecting oversized vectors and non-bijections.
    pub fn from_images(images: Vec<usize>) -> Result<Self, PermutationError> {
        check_capacity(images.len())?;
        let perm = Self(images);
        if perm.is_bijection() {
            Ok(perm)
        } else {
            Err(PermutationError::InvalidImages { len: perm.len() })
        }
    }

    /// Induced permutation of one automorphism over `index`.
    pub fn from_automorphism(
        automorphism: &Automorphism,
        index: &EdgeIndex,
    ) -> Result<Self, PermutationError> {
        let mut images = Vec::with_capacity(index.len());
        for &edge in index.edges() {
            let (u, v) = edge.endpoints();
            let image_of = |vertex: usize| {
                automorphism
                    .apply(vertex)
                    .ok_or_else(|| PermutationError::VertexOutsideDomain {
                        automorphism: automorphism.clone(),
                        vertex,
                    })
            };
            let image = UndirectedEdge::new(image_of(u)?, image_of(v)?);
            let slot = index.slot(image.u, image.v).ok_or_else(|| {
                PermutationError::MalformedAutomorphism {
                    automorphism: automorphism.clone(),
                    edge,
                    image,
                }
            })?;
            images.push(slot);
        }

        Self::from_images(images).map_err(|_| PermutationError::NotABijection {
            automorphism: automorphism.clone(),
        })
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this acts on zero slots.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Slot image vector.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Whether this is the identity.
    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &s)| i == s)
    }

    /// Whether the image vector is a bijection on `0..len`.
    pub fn is_bijection(&self) -> bool {
        let mut seen = vec![false; self.0.len()];
        for &slot in &self.0 {
            match seen.get_mut(slot) {
                Some(hit) if !*hit => *hit = true,
                _ => return false,
            }
        }
        true
    }

    /// Apply `self` first, then `next`: `r[i] = next[self[i]]`.
    pub fn then(&self, next: &EdgePermutation) -> Result<EdgePermutation, PermutationError> {
        if self.len() != next.len() {
            return Err(PermutationError::LengthMismatch {
                expected: self.len(),
                found: next.len(),
            });
        }
        Ok(Self(self.0.iter().map(|&s| next.0[s]).collect()))
    }

    /// Inverse permutation.
    pub fn inverse(&self) -> EdgePermutation {
        let mut inverse = vec![0; self.0.len()];
        for (i, &s) in self.0.iter().enumerate() {
            inverse[s] = i;
        }
        Self(inverse)
    }

    /// Image of `mask`, checking that the mask fits this permutation.
    pub fn try_apply(&self, mask: TreeMask) -> Result<TreeMask, PermutationError> {
        if mask.bit_width() > self.len() {
            return Err(IndexError::InconsistentEdgeIndex {
                bit_width: mask.bit_width(),
                slots: self.len(),
            }
            .into());
        }
        Ok(apply_permutation(mask, self))
    }
}

impl TryFrom<Vec<usize>> for EdgePermutation {
    type Error = PermutationError;

    fn try_from(images: Vec<usize>) -> Result<Self, Self::Error> {
        Self::from_images(images)
    }
}

impl From<EdgePermutation> for Vec<usize> {
    fn from(perm: EdgePermutation) -> Self {
        perm.0
    }
}

fn check_capacity(len: usize) -> Result<(), PermutationError> {
    if len > MAX_EDGE_SLOTS {
        return Err(IndexError::CapacityExceeded {
            edges: len,
            max: MAX_EDGE_SLOTS,
        }
        .into());
    }
    Ok(())
}

/// Derive the edge permutation of every automorphism.
///
/// Fails on the first automorphism whose image of some edge is not an edge;
/// a partial permutation set would silently under-canonicalize.
pub fn derive_edge_permutations<'a, I>(
    automorphisms: I,
    index: &EdgeIndex,
) -> Result<Vec<EdgePermutation>, PermutationError>
where
    I: IntoIterator<Item = &'a Automorphism>,
{
    automorphisms
        .into_iter()
        .map(|automorphism| EdgePermutation::from_automorphism(automorphism, index))
        .collect()
}

/// Move bit `i` of `mask` to bit `perm[i]`.
///
/// Visits set bits only, one step per edge in the subset.
///
/// # Panics
///
/// Panics if `mask` sets a bit at or beyond `perm.len()`; masks built from
/// the same [`EdgeIndex`] as `perm` always fit. See
/// [`EdgePermutation::try_apply`] for the checked form.
#[inline]
pub fn apply_permutation(mask: TreeMask, perm: &EdgePermutation) -> TreeMask {
    let mut out = 0u128;
    let mut bits = mask.bits();
    while bits != 0 {
        let slot = bits.trailing_zeros() as usize;
        out |= 1u128 << perm.0[slot];
        bits &= bits - 1;
    }
    TreeMask::new(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SimpleGraph;

    fn c4() -> (SimpleGraph, EdgeIndex) {
        let graph = SimpleGraph::cycle(4);
        let index = EdgeIndex::build(&graph).unwrap();
        (graph, index)
    }

    #[test]
    fn test_identity_automorphism_gives_identity() {
        let (_, index) = c4();
        let perm = EdgePermutation::from_automorphism(&Automorphism::identity(4), &index).unwrap();
        assert!(perm.is_identity());
    }

    #[test]
    fn test_rotation_of_c4() {
        // Slots: 0=(0,1) 1=(0,3) 2=(1,2) 3=(2,3)
        let (_, index) = c4();
        let rotation = Automorphism::new(vec![1, 2, 3, 0]);
        let perm = EdgePermutation::from_automorphism(&rotation, &index).unwrap();
        // (0,1)->(1,2), (0,3)->(0,1), (1,2)->(2,3), (2,3)->(0,3)
        assert_eq!(perm.as_slice(), &[2, 0, 3, 1]);
        assert!(perm.is_bijection());
    }

    #[test]
    fn test_malformed_automorphism() {
        let (_, index) = c4();
        // Swapping 0 and 1 sends (0,3) to (1,3), which is a diagonal
        let bad = Automorphism::new(vec![1, 0, 2, 3]);
        let err = EdgePermutation::from_automorphism(&bad, &index).unwrap_err();
        assert!(matches!(
            err,
            PermutationError::MalformedAutomorphism { image, .. } if image == UndirectedEdge::new(1, 3)
        ));
    }

    #[test]
    fn test_short_automorphism() {
        let (_, index) = c4();
        let err = EdgePermutation::from_automorphism(&Automorphism::identity(2), &index).unwrap_err();
        // (0,1) maps fine, (0,3) reaches past the domain
        assert!(matches!(err, PermutationError::VertexOutsideDomain { vertex: 3, .. }));
    }

    #[test]
    fn test_collapsing_map_rejected() {
        let graph = SimpleGraph::path(3);
        let index = EdgeIndex::build(&graph).unwrap();
        // Both edges land on (0,1)
        let collapse = Automorphism::new(vec![0, 1, 0]);
        let err = EdgePermutation::from_automorphism(&collapse, &index).unwrap_err();
        assert!(matches!(err, PermutationError::NotABijection { .. }));
    }

    #[test]
    fn test_derive_fails_loudly() {
        let (_, index) = c4();
        let autos = vec![Automorphism::identity(4), Automorphism::new(vec![1, 0, 2, 3])];
        assert!(derive_edge_permutations(&autos, &index).is_err());
    }

    #[test]
    fn test_apply_moves_set_bits() {
        let perm = EdgePermutation::from_images(vec![2, 0, 3, 1]).unwrap();
        assert_eq!(apply_permutation(TreeMask::new(0b0001), &perm).bits(), 0b0100);
        assert_eq!(apply_permutation(TreeMask::new(0b1010), &perm).bits(), 0b0011);
        assert_eq!(apply_permutation(TreeMask::EMPTY, &perm), TreeMask::EMPTY);
    }

    #[test]
    fn test_then_matches_sequential_application() {
        let p = EdgePermutation::from_images(vec![2, 0, 3, 1]).unwrap();
        let q = EdgePermutation::from_images(vec![1, 0, 3, 2]).unwrap();
        let pq = p.then(&q).unwrap();
        for bits in 0..16u128 {
            let mask = TreeMask::new(bits);
            assert_eq!(
                apply_permutation(apply_permutation(mask, &p), &q),
                apply_permutation(mask, &pq)
            );
        }
        assert!(p.then(&p.inverse()).unwrap().is_identity());
    }

    #[test]
    fn test_try_apply_checks_width() {
        let perm = EdgePermutation::identity(2).unwrap();
        assert!(perm.try_apply(TreeMask::new(0b11)).is_ok());
        assert!(matches!(
            perm.try_apply(TreeMask::new(0b100)),
            Err(PermutationError::Index(IndexError::InconsistentEdgeIndex { .. }))
        ));
    }

    #[test]
    fn test_from_images_rejects_non_bijection() {
        assert!(matches!(
            EdgePermutation::from_images(vec![0, 0]),
            Err(PermutationError::InvalidImages { len: 2 })
        ));
        assert!(EdgePermutation::from_images(vec![0, 2]).is_err());
    }

    #[test]
    fn test_slot_count_capped_at_mask_width() {
        // Swap slots 0 and 150 of a 200-slot bijection
        let mut images: Vec<usize> = (0..200).collect();
        images.swap(0, 150);
        assert!(matches!(
            EdgePermutation::from_images(images),
            Err(PermutationError::Index(IndexError::CapacityExceeded { edges: 200, max: 128 }))
        ));
        assert!(EdgePermutation::identity(200).is_err());

        let widest = EdgePermutation::identity(MAX_EDGE_SLOTS).unwrap();
        let top = TreeMask::singleton(MAX_EDGE_SLOTS - 1);
        assert_eq!(widest.try_apply(top).unwrap(), top);
    }

    #[test]
    fn test_deserialize_validates_images() {
        let perm: EdgePermutation = serde_json::from_str("[2,0,3,1]").unwrap();
        assert_eq!(perm.as_slice(), &[2, 0, 3, 1]);
        assert_eq!(serde_json::to_string(&perm).unwrap(), "[2,0,3,1]");

        assert!(serde_json::from_str::<EdgePermutation>("[0,0]").is_err());
        assert!(serde_json::from_str::<EdgePermutation>("[1,5]").is_err());
        let oversized = serde_json::to_string(&(0..200).collect::<Vec<usize>>()).unwrap();
        assert!(serde_json::from_str::<EdgePermutation>(&oversized).is_err());
    }
}
