//! # Recurrent Cell Implementations
//!
//! A cell holds the parameters of a recurrent dynamical system and knows how
//! to advance a single node by one time point. The sequence-level operations
//! (simulation, prediction, training) live in [`crate::rnn`] and work with
//! any cell through the [`RecurrentCell`] trait.
//!
//! ## Cell Types
//!
//! | Cell | Update rule | Parameters per node |
//! |------|-------------|---------------------|
//! | [`RnnCell`] | `x'[i] = σ(Σ_j W[i,j]·x[j] + B[i])` | `N + 1` |
//! | [`DrnnCell`] | `x'[i] = x[i] + (Δt/T[i])·(−x[i] + σ(Σ_j W[i,j]·x[j] + B[i]))` | `N + 2` |
//!
//! ## Weight Matrix Convention
//!
//! `W[i, j]` is the effect of regulator `j` (column) on target `i` (row).
//! In a graph, this is the edge `j -> i`.
//!
//! ## Parameter Vector Layout
//!
//! Vectors are node-major. For each node `i` in index order the block is:
//!
//! ```text
//! [ W[i, j] for each regulator j (ascending) | B[i] | raw T[i] (DRNN only) ]
//! ```
//!
//! A complete model lists every `j` in `0..N`; a graph-constrained model only
//! the predecessors of `i`. Because every block is contiguous, a single
//! node's block can be set on its own, which is what decomposed training
//! relies on.

use std::fmt;

use ndarray::{Array1, Array2, ArrayView1};

use crate::error::{NetInfError, Result};
use crate::graph::{Digraph, NodeId};

pub mod drnn_cell;
pub mod rnn_cell;

pub use drnn_cell::DrnnCell;
pub use rnn_cell::RnnCell;

/// Common interface of the plain and decaying recurrent models
pub trait RecurrentCell: Clone + fmt::Debug + Send + Sync {
    /// Parameters per node on top of the regulator weights
    const EXTRA_PARAMS: usize;

    /// Creates a cell with `nodes` nodes and neutral parameters
    fn with_nodes(nodes: usize) -> Self;

    fn nodes(&self) -> usize;

    /// Weight matrix (target rows, regulator columns)
    fn w(&self) -> &Array2<f64>;

    fn b(&self) -> &Array1<f64>;

    /// Resets every parameter to its neutral value
    fn reset(&mut self);

    /// Resets the parameters of a single node
    fn reset_node(&mut self, node: usize) -> Result<()>;

    /// Writes one node's parameter block; absent regulators get zero weight
    fn set_node_block(&mut self, node: usize, regulators: &[usize], block: &[f64]);

    /// Value of `node` at the next time point, given the state at the current one
    fn update(&self, node: usize, state: ArrayView1<'_, f64>) -> f64;

    /// Number of parameters of one node in a complete model
    fn dim_of_single_node(nodes: usize) -> usize {
        nodes + Self::EXTRA_PARAMS
    }

    /// Number of parameters of a complete model with `nodes` nodes
    fn dim_for_nodes(nodes: usize) -> usize {
        nodes * Self::dim_of_single_node(nodes)
    }

    /// Inverse of [`RecurrentCell::dim_for_nodes`]; `None` if `dim` is not
    /// the dimensionality of any complete model
    fn nodes_for_dim(dim: usize) -> Option<usize> {
        // n^2 + e*n - dim = 0
        let e = Self::EXTRA_PARAMS as f64;
        let root = ((e * e + 4.0 * dim as f64).sqrt() - e) / 2.0;
        let guess = root.round() as usize;
        (guess.saturating_sub(1)..=guess + 1).find(|&n| Self::dim_for_nodes(n) == dim)
    }

    /// Number of parameters of `node` when constrained to `graph`
    fn dim_for_node(node: usize, graph: &Digraph) -> Result<usize> {
        if !graph.has_node(NodeId(node)) {
            return Err(NetInfError::UnknownNode(node));
        }
        Ok(graph.in_degree(NodeId(node)) + Self::EXTRA_PARAMS)
    }

    /// Number of parameters of a model constrained to `graph`
    fn dim_for_graph(graph: &Digraph) -> usize {
        graph.edge_count() + graph.node_count() * Self::EXTRA_PARAMS
    }

    /// Regulators of `node` in parameter order
    fn regulators(&self, node: usize, graph: Option<&Digraph>) -> Vec<usize> {
        match graph {
            Some(g) => g.predecessors(NodeId(node)).iter().map(|n| n.index()).collect(),
            None => (0..self.nodes()).collect(),
        }
    }

    /// Unpacks a flat parameter vector.
    ///
    /// * `graph` - restrict weights to the graph's edges (absent edges are zero)
    /// * `node` - `vec` holds only this node's block; other nodes are untouched
    fn set_from_vector(
        &mut self,
        vec: &[f64],
        graph: Option<&Digraph>,
        node: Option<usize>,
    ) -> Result<()> {
        let nodes = self.nodes();
        if let Some(g) = graph {
            g.check_indexed(nodes)?;
        }

        if let Some(node) = node {
            if node >= nodes {
                return Err(NetInfError::UnknownNode(node));
            }
            let regulators = self.regulators(node, graph);
            let expected = regulators.len() + Self::EXTRA_PARAMS;
            if vec.len() != expected {
                return Err(NetInfError::DimensionMismatch {
                    expected,
                    found: vec.len(),
                });
            }
            self.set_node_block(node, &regulators, vec);
            return Ok(());
        }

        let expected = match graph {
            Some(g) => Self::dim_for_graph(g),
            None => Self::dim_for_nodes(nodes),
        };
        if vec.len() != expected {
            return Err(NetInfError::DimensionMismatch {
                expected,
                found: vec.len(),
            });
        }
        let mut offset = 0;
        for i in 0..nodes {
            let regulators = self.regulators(i, graph);
            let len = regulators.len() + Self::EXTRA_PARAMS;
            self.set_node_block(i, &regulators, &vec[offset..offset + len]);
            offset += len;
        }
        Ok(())
    }
}

/// Writes the weight part of a block into row `node` of `w`
pub(crate) fn write_weights(w: &mut Array2<f64>, node: usize, regulators: &[usize], block: &[f64]) {
    let mut row = w.row_mut(node);
    row.fill(0.0);
    for (&j, &value) in regulators.iter().zip(block) {
        row[j] = value;
    }
}

/// Checks that `w` is square and `b` matches it
pub(crate) fn check_shapes(w: &Array2<f64>, b: &Array1<f64>) -> Result<usize> {
    let (rows, cols) = w.dim();
    if rows != cols {
        return Err(NetInfError::DimensionMismatch {
            expected: rows,
            found: cols,
        });
    }
    if b.len() != rows {
        return Err(NetInfError::DimensionMismatch {
            expected: rows,
            found: b.len(),
        });
    }
    Ok(rows)
}
