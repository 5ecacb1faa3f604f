//! Sequence-level operations shared by every recurrent cell.

use std::fmt;

use ndarray::{Array1, ArrayView1};

use crate::cells::RecurrentCell;
use crate::dynamics::Dynamics;
use crate::error::{NetInfError, Result};
use crate::graph::Digraph;

/// A recurrent network: a cell plus the sequence operations built on it
///
/// # Type Parameters
/// * `C` - the cell type ([`RnnCell`](crate::cells::RnnCell) or
///   [`DrnnCell`](crate::cells::DrnnCell))
#[derive(Clone, Debug, PartialEq)]
pub struct Network<C: RecurrentCell> {
    cell: C,
}

impl<C: RecurrentCell> Network<C> {
    /// Creates a network with `nodes` nodes and neutral parameters
    pub fn new(nodes: usize) -> Self {
        Self {
            cell: C::with_nodes(nodes),
        }
    }

    pub fn from_cell(cell: C) -> Self {
        Self { cell }
    }

    /// Builds a network directly from a parameter vector
    pub fn from_vector(nodes: usize, vec: &[f64], graph: Option<&Digraph>) -> Result<Self> {
        let mut network = Self::new(nodes);
        network.set_from_vector(vec, graph, None)?;
        Ok(network)
    }

    pub fn cell(&self) -> &C {
        &self.cell
    }

    pub fn cell_mut(&mut self) -> &mut C {
        &mut self.cell
    }

    pub fn into_cell(self) -> C {
        self.cell
    }

    pub fn nodes(&self) -> usize {
        self.cell.nodes()
    }

    pub fn reset(&mut self) {
        self.cell.reset();
    }

    pub fn reset_node(&mut self, node: usize) -> Result<()> {
        self.cell.reset_node(node)
    }

    /// See [`RecurrentCell::set_from_vector`]
    pub fn set_from_vector(
        &mut self,
        vec: &[f64],
        graph: Option<&Digraph>,
        node: Option<usize>,
    ) -> Result<()> {
        self.cell.set_from_vector(vec, graph, node)
    }

    /// Integrates forward from `x0`, producing `tpoints` time points
    /// (row 0 is `x0` itself)
    pub fn simulate_from_state(&self, x0: ArrayView1<'_, f64>, tpoints: usize) -> Result<Dynamics> {
        let nodes = self.nodes();
        if x0.len() != nodes {
            return Err(NetInfError::DimensionMismatch {
                expected: nodes,
                found: x0.len(),
            });
        }
        let mut out = Dynamics::new(nodes, tpoints);
        if tpoints == 0 {
            return Ok(out);
        }

        let mut state: Array1<f64> = x0.to_owned();
        let mut next = Array1::zeros(nodes);
        for t in 0..tpoints {
            for (i, &v) in state.iter().enumerate() {
                out.set_value(i, t, v);
            }
            if t + 1 == tpoints {
                break;
            }
            for i in 0..nodes {
                next[i] = self.cell.update(i, state.view());
            }
            std::mem::swap(&mut state, &mut next);
        }
        Ok(out)
    }

    /// One-step-ahead prediction driven by an observed trajectory.
    ///
    /// Row 0 is copied from `dynamics`; row `t + 1` is the update applied
    /// to the observed row `t`.
    pub fn predict(&self, dynamics: &Dynamics) -> Result<Dynamics> {
        self.check_vars(dynamics)?;
        let (nodes, tpoints) = (self.nodes(), dynamics.tpoints());
        let mut out = Dynamics::new(nodes, tpoints);
        if tpoints == 0 {
            return Ok(out);
        }
        for i in 0..nodes {
            out.set_value(i, 0, dynamics.value(i, 0));
        }
        for t in 1..tpoints {
            let observed = dynamics.row(t - 1);
            for i in 0..nodes {
                out.set_value(i, t, self.cell.update(i, observed));
            }
        }
        Ok(out)
    }

    /// [`Network::predict`] restricted to one node, as a one-variable trajectory
    pub fn predict_target(&self, dynamics: &Dynamics, target: usize) -> Result<Dynamics> {
        self.check_vars(dynamics)?;
        if target >= self.nodes() {
            return Err(NetInfError::UnknownNode(target));
        }
        let tpoints = dynamics.tpoints();
        let mut out = Dynamics::new(1, tpoints);
        if tpoints == 0 {
            return Ok(out);
        }
        out.set_value(0, 0, dynamics.value(target, 0));
        for t in 1..tpoints {
            out.set_value(0, t, self.cell.update(target, dynamics.row(t - 1)));
        }
        Ok(out)
    }

    fn check_vars(&self, dynamics: &Dynamics) -> Result<()> {
        if dynamics.vars() != self.nodes() {
            return Err(NetInfError::DimensionMismatch {
                expected: self.nodes(),
                found: dynamics.vars(),
            });
        }
        Ok(())
    }
}

impl<C: RecurrentCell + fmt::Display> fmt::Display for Network<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cell)
    }
}
