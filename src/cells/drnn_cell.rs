//! Decaying recurrent cell (leaky integration with per-node time constants).

use std::fmt;

use ndarray::{Array1, Array2, ArrayView1};

use super::{check_shapes, write_weights, RecurrentCell, RnnCell};
use crate::error::{NetInfError, Result};

/// Default integration step
pub const DEFAULT_DELTA_T: f64 = 1.0;

/// Neutral time constant used by `reset`
pub const DEFAULT_TAU: f64 = 1.0;

/// Decaying RNN:
/// `x'[i] = x[i] + (Δt/T[i])·(−x[i] + σ(Σ_j W[i,j]·x[j] + B[i]))`
///
/// Time constants are strictly positive. Inside a parameter vector the time
/// constant of node `i` is stored raw and decoded as `T[i] = Δt + |p|`, so
/// any real `p` yields a valid cell with `Δt/T[i] <= 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct DrnnCell {
    base: RnnCell,
    /// Time constants (must be positive)
    t: Array1<f64>,
    delta_t: f64,
}

impl DrnnCell {
    /// Creates a cell from explicit parameters
    pub fn from_parts(
        w: Array2<f64>,
        b: Array1<f64>,
        t: Array1<f64>,
        delta_t: f64,
    ) -> Result<Self> {
        let nodes = check_shapes(&w, &b)?;
        if t.len() != nodes {
            return Err(NetInfError::DimensionMismatch {
                expected: nodes,
                found: t.len(),
            });
        }
        if let Some(bad) = t.iter().find(|&&tau| tau <= 0.0 || !tau.is_finite()) {
            return Err(NetInfError::Config(format!(
                "time constants must be positive, got {}",
                bad
            )));
        }
        Self::check_delta_t(delta_t)?;
        Ok(Self {
            base: RnnCell::from_parts(w, b)?,
            t,
            delta_t,
        })
    }

    /// Sets the integration step
    pub fn with_delta_t(mut self, delta_t: f64) -> Result<Self> {
        self.set_delta_t(delta_t)?;
        Ok(self)
    }

    pub fn set_delta_t(&mut self, delta_t: f64) -> Result<()> {
        Self::check_delta_t(delta_t)?;
        self.delta_t = delta_t;
        Ok(())
    }

    pub fn delta_t(&self) -> f64 {
        self.delta_t
    }

    pub fn t(&self) -> &Array1<f64> {
        &self.t
    }

    /// Decodes a raw time-constant parameter
    #[inline]
    pub fn decode_tau(&self, raw: f64) -> f64 {
        self.delta_t + raw.abs()
    }

    fn check_delta_t(delta_t: f64) -> Result<()> {
        if delta_t <= 0.0 || !delta_t.is_finite() {
            return Err(NetInfError::Config(format!(
                "integration step must be positive, got {}",
                delta_t
            )));
        }
        Ok(())
    }
}

impl RecurrentCell for DrnnCell {
    const EXTRA_PARAMS: usize = 2;

    fn with_nodes(nodes: usize) -> Self {
        Self {
            base: RnnCell::with_nodes(nodes),
            t: Array1::from_elem(nodes, DEFAULT_TAU),
            delta_t: DEFAULT_DELTA_T,
        }
    }

    fn nodes(&self) -> usize {
        self.base.nodes()
    }

    fn w(&self) -> &Array2<f64> {
        self.base.w()
    }

    fn b(&self) -> &Array1<f64> {
        self.base.b()
    }

    fn reset(&mut self) {
        self.base.reset();
        self.t.fill(DEFAULT_TAU);
    }

    fn reset_node(&mut self, node: usize) -> Result<()> {
        self.base.reset_node(node)?;
        self.t[node] = DEFAULT_TAU;
        Ok(())
    }

    fn set_node_block(&mut self, node: usize, regulators: &[usize], block: &[f64]) {
        let k = regulators.len();
        write_weights(self.base.w_mut(), node, regulators, block);
        self.base.b_mut()[node] = block[k];
        self.t[node] = self.decode_tau(block[k + 1]);
    }

    #[inline]
    fn update(&self, node: usize, state: ArrayView1<'_, f64>) -> f64 {
        let x = state[node];
        x + (self.delta_t / self.t[node]) * (-x + self.base.activation(node, state))
    }
}

impl fmt::Display for DrnnCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.base)?;
        let t: Vec<String> = self.t.iter().map(|v| format!("{:.5e}", v)).collect();
        write!(f, "T = {}\ndt = {}", t.join("\t"), self.delta_t)
    }
}
