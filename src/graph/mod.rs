//! # Regulatory Graphs
//!
//! [`Digraph`] is the topology search space: a directed graph whose edges
//! `j -> i` read "regulator `j` acts on target `i`". Generators build
//! candidate graphs over the node ids `0..N`:
//!
//! | Generator | Description |
//! |-----------|-------------|
//! | [`Complete`] | Every ordered pair (optionally without self-loops) |
//! | [`Random`] | Uniformly chosen edge subset of a given density |
//! | [`Edsf`] | Extended directed scale-free growth model |
//!
//! Pheromone-guided construction lives in [`crate::aco`].

use serde::{Deserialize, Serialize};

mod base;
mod digraph;
mod edsf;
mod random;

pub use base::{Complete, GraphGenerator};
pub use digraph::{Attrs, Digraph, Edge, EdgeScore, NodeId};
pub use edsf::Edsf;
pub use random::Random;

/// Flat serialization form of a [`Digraph`]: `(node, attrs)` pairs in
/// insertion order and `(src, dest, attrs)` triples.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    pub nodes: Vec<(usize, Attrs)>,
    pub edges: Vec<(usize, usize, Attrs)>,
}
