//! Canonical forms and orbit deduplication of spanning trees.
//!
//! The canonical form of a mask is the numerically smallest mask in its orbit
//! under the edge permutations of the automorphism group. Two trees are
//! symmetry-equivalent iff their canonical forms are equal, so counting
//! distinct canonical forms counts classes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::edge_index::EdgeIndex;
use crate::permutation::{apply_permutation, EdgePermutation, PermutationError};
use crate::types::{TreeMask, UndirectedEdge};

/// Smallest image of `mask` under `perms`.
///
/// `mask` itself always takes part, so leaving the identity out of `perms`
/// does not change the result.
pub fn canonicalize(mask: TreeMask, perms: &[EdgePermutation]) -> TreeMask {
    perms
        .iter()
        .map(|perm| apply_permutation(mask, perm))
        .fold(mask, TreeMask::min)
}

/// Every distinct image of `mask` under `perms`, sorted.
pub fn orbit(mask: TreeMask, perms: &[EdgePermutation]) -> Vec<TreeMask> {
    let mut images: Vec<TreeMask> = perms
        .iter()
        .map(|perm| apply_permutation(mask, perm))
        .chain(std::iter::once(mask))
        .collect();
    images.sort_unstable();
    images.dedup();
    images
}

/// Tree and class totals of a deduplication pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCount {
    /// Trees processed.
    pub n_trees: usize,
    /// Distinct canonical forms.
    pub n_classes: usize,
}

impl ClassCount {
    /// Average trees per class. Diagnostic only.
    pub fn trees_per_class(&self) -> Option<f64> {
        (self.n_classes > 0).then(|| self.n_trees as f64 / self.n_classes as f64)
    }
}

/// Accumulates canonical forms of trees, one insertion per tree.
///
/// The set only grows; inserting a tree whose class is known is a no-op
/// apart from the tree counter.
#[derive(Debug, Clone)]
pub struct OrbitDeduplicator<'a> {
    index: &'a EdgeIndex,
    perms: &'a [EdgePermutation],
    classes: HashSet<TreeMask>,
    n_trees: usize,
}

impl<'a> OrbitDeduplicator<'a> {
    /// Create a deduplicator. Every permutation must act on `index.len()` slots.
    pub fn new(index: &'a EdgeIndex, perms: &'a [EdgePermutation]) -> Result<Self, PermutationError> {
        check_lengths(index, perms)?;
        Ok(Self {
            index,
            perms,
            classes: HashSet::new(),
            n_trees: 0,
        })
    }

    /// Record a tree given as a mask. Returns true if it opened a new class.
    pub fn insert_mask(&mut self, mask: TreeMask) -> Result<bool, PermutationError> {
        self.index.check_mask(mask)?;
        self.n_trees += 1;
        Ok(self.classes.insert(canonicalize(mask, self.perms)))
    }

    /// Record a tree given by its edges. Returns true if it opened a new class.
    pub fn insert_tree(&mut self, edges: &[UndirectedEdge]) -> Result<bool, PermutationError> {
        let mask = self.index.mask_of(edges.iter().copied())?;
        self.insert_mask(mask)
    }

    /// Record every tree of `trees`.
    pub fn extend_trees<I, T>(&mut self, trees: I) -> Result<(), PermutationError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[UndirectedEdge]>,
    {
        for tree in trees {
            self.insert_tree(tree.as_ref())?;
        }
        Ok(())
    }

    /// Trees recorded so far.
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// Classes seen so far.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Canonical representatives, sorted.
    pub fn representatives(&self) -> Vec<TreeMask> {
        let mut reps: Vec<TreeMask> = self.classes.iter().copied().collect();
        reps.sort_unstable();
        reps
    }

    /// Totals so far.
    pub fn count(&self) -> ClassCount {
        ClassCount {
            n_trees: self.n_trees,
            n_classes: self.classes.len(),
        }
    }
}

fn check_lengths(index: &EdgeIndex, perms: &[EdgePermutation]) -> Result<(), PermutationError> {
    match perms.iter().find(|perm| perm.len() != index.len()) {
        Some(perm) => Err(PermutationError::LengthMismatch {
            expected: index.len(),
            found: perm.len(),
        }),
        None => Ok(()),
    }
}

/// Count trees and symmetry classes in one pass over `trees`.
///
/// An empty tree sequence gives zero trees and zero classes.
pub fn count_equivalence_classes<I, T>(
    trees: I,
    index: &EdgeIndex,
    perms: &[EdgePermutation],
) -> Result<ClassCount, PermutationError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[UndirectedEdge]>,
{
    let mut dedup = OrbitDeduplicator::new(index, perms)?;
    dedup.extend_trees(trees)?;
    Ok(dedup.count())
}

/// Masks canonicalized per parallel batch.
#[cfg(feature = "parallel")]
pub const PAR_BATCH: usize = 1 << 16;

#[cfg(feature = "parallel")]
impl OrbitDeduplicator<'_> {
    /// Canonicalize a batch of masks on the rayon pool and record them.
    ///
    /// Workers only read the shared permutation list; their results are
    /// merged into the class set afterwards, so insertion order is irrelevant.
    pub fn insert_masks_par(&mut self, masks: &[TreeMask]) -> Result<(), PermutationError> {
        use rayon::prelude::*;

        for &mask in masks {
            self.index.check_mask(mask)?;
        }
        let perms = self.perms;
        let forms: HashSet<TreeMask> = masks
            .par_iter()
            .map(|&mask| canonicalize(mask, perms))
            .collect();
        self.n_trees += masks.len();
        self.classes.extend(forms);
        Ok(())
    }

    /// Record every tree of `trees`, canonicalizing in batches of [`PAR_BATCH`].
    pub fn extend_par<I, T>(&mut self, trees: I) -> Result<(), PermutationError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[UndirectedEdge]>,
    {
        let mut batch = Vec::with_capacity(PAR_BATCH);
        for tree in trees {
            batch.push(self.index.mask_of(tree.as_ref().iter().copied())?);
            if batch.len() == PAR_BATCH {
                self.insert_masks_par(&batch)?;
                batch.clear();
            }
        }
        if !batch.is_empty() {
            self.insert_masks_par(&batch)?;
        }
        Ok(())
    }
}

/// Parallel form of [`count_equivalence_classes`]. Same result.
#[cfg(feature = "parallel")]
pub fn count_equivalence_classes_par<I, T>(
    trees: I,
    index: &EdgeIndex,
    perms: &[EdgePermutation],
) -> Result<ClassCount, PermutationError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[UndirectedEdge]>,
{
    let mut dedup = OrbitDeduplicator::new(index, perms)?;
    dedup.extend_par(trees)?;
    Ok(dedup.count())
}
