//! Core types shared by every stage.

pub mod graph;
pub mod mask;
pub mod automorphism;

pub use graph::{SimpleGraph, UndirectedEdge, GraphError};
pub use mask::{TreeMask, Slots, MAX_EDGE_SLOTS};
pub use automorphism::Automorphism;
