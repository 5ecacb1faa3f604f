//! Plain discrete-time recurrent cell (weights and biases only).

use std::fmt;

use ndarray::{Array1, Array2, ArrayView1};

use super::{check_shapes, write_weights, RecurrentCell};
use crate::activation::Sigmoid;
use crate::error::{NetInfError, Result};

/// Discrete-time RNN: `x'[i] = σ(Σ_j W[i,j]·x[j] + B[i])`
#[derive(Clone, Debug, PartialEq)]
pub struct RnnCell {
    /// Weight matrix, `W[i, j]` = effect of `j` on `i`
    w: Array2<f64>,
    /// Bias vector
    b: Array1<f64>,
    activation: Sigmoid,
}

impl RnnCell {
    /// Creates a cell from explicit parameters
    pub fn from_parts(w: Array2<f64>, b: Array1<f64>) -> Result<Self> {
        check_shapes(&w, &b)?;
        Ok(Self {
            w,
            b,
            activation: Sigmoid::default(),
        })
    }

    /// Replaces the logistic activation (steepness / scale)
    pub fn with_activation(mut self, activation: Sigmoid) -> Self {
        self.activation = activation;
        self
    }

    pub fn w_mut(&mut self) -> &mut Array2<f64> {
        &mut self.w
    }

    pub fn b_mut(&mut self) -> &mut Array1<f64> {
        &mut self.b
    }

    /// `σ(Σ_j W[i,j]·x[j] + B[i])`
    #[inline]
    pub fn activation(&self, node: usize, state: ArrayView1<'_, f64>) -> f64 {
        self.activation
            .forward(self.w.row(node).dot(&state) + self.b[node])
    }
}

impl RecurrentCell for RnnCell {
    const EXTRA_PARAMS: usize = 1;

    fn with_nodes(nodes: usize) -> Self {
        Self {
            w: Array2::zeros((nodes, nodes)),
            b: Array1::zeros(nodes),
            activation: Sigmoid::default(),
        }
    }

    fn nodes(&self) -> usize {
        self.b.len()
    }

    fn w(&self) -> &Array2<f64> {
        &self.w
    }

    fn b(&self) -> &Array1<f64> {
        &self.b
    }

    fn reset(&mut self) {
        self.w.fill(0.0);
        self.b.fill(0.0);
    }

    fn reset_node(&mut self, node: usize) -> Result<()> {
        if node >= self.nodes() {
            return Err(NetInfError::UnknownNode(node));
        }
        self.w.row_mut(node).fill(0.0);
        self.b[node] = 0.0;
        Ok(())
    }

    fn set_node_block(&mut self, node: usize, regulators: &[usize], block: &[f64]) {
        write_weights(&mut self.w, node, regulators, block);
        self.b[node] = block[regulators.len()];
    }

    #[inline]
    fn update(&self, node: usize, state: ArrayView1<'_, f64>) -> f64 {
        self.activation(node, state)
    }
}

impl fmt::Display for RnnCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "W =")?;
        for row in self.w.outer_iter() {
            let line: Vec<String> = row.iter().map(|v| format!("{:.5e}", v)).collect();
            writeln!(f, "  {}", line.join("\t"))?;
        }
        let b: Vec<String> = self.b.iter().map(|v| format!("{:.5e}", v)).collect();
        write!(f, "B = {}", b.join("\t"))
    }
}
