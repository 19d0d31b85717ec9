//! Edge-subset bitmasks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of edge slots a [`TreeMask`] can address.
pub const MAX_EDGE_SLOTS: usize = 128;

/// Subset of edge slots, bit `i` set iff slot `i` is a member.
///
/// Ordering is numeric, which makes the smallest orbit element well defined.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TreeMask(u128);

impl TreeMask {
    /// The empty subset.
    pub const EMPTY: TreeMask = TreeMask(0);

    /// Wrap a raw bit pattern.
    pub const fn new(bits: u128) -> Self {
        Self(bits)
    }

    /// Mask with only `slot` set. `slot` must be below [`MAX_EDGE_SLOTS`].
    pub fn singleton(slot: usize) -> Self {
        debug_assert!(slot < MAX_EDGE_SLOTS);
        Self(1u128 << slot)
    }

    /// Mask with slots `0..len` set.
    pub fn full(len: usize) -> Self {
        if len >= MAX_EDGE_SLOTS {
            Self(u128::MAX)
        } else {
            Self((1u128 << len) - 1)
        }
    }

    /// Raw bit pattern.
    pub const fn bits(self) -> u128 {
        self.0
    }

    /// Number of set slots.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether no slot is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of significant bits (0 for the empty mask).
    pub fn bit_width(self) -> usize {
        (u128::BITS - self.0.leading_zeros()) as usize
    }

    /// Whether `slot` is set.
    pub fn contains(self, slot: usize) -> bool {
        slot < MAX_EDGE_SLOTS && self.0 & (1u128 << slot) != 0
    }

    /// Set `slot`.
    pub fn insert(&mut self, slot: usize) {
        self.0 |= Self::singleton(slot).0;
    }

    /// Iterate over set slots, lowest first.
    pub fn slots(self) -> Slots {
        Slots(self.0)
    }
}

impl fmt::Display for TreeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}

impl From<u128> for TreeMask {
    fn from(bits: u128) -> Self {
        Self(bits)
    }
}

impl FromIterator<usize> for TreeMask {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut mask = Self::EMPTY;
        for slot in iter {
            mask.insert(slot);
        }
        mask
    }
}

/// Iterator over the set slots of a mask.
///
/// Extracts the lowest set bit and clears it on every step, so a full pass
/// costs one iteration per member rather than one per slot.
#[derive(Debug, Clone)]
pub struct Slots(u128);

impl Iterator for Slots {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let slot = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Slots {}
