//! Parameter fitting with PSO.

use ndarray::Array1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::network::Network;
use crate::cells::RecurrentCell;
use crate::dynamics::{series_mse, Dynamics};
use crate::error::{NetInfError, Result};
use crate::graph::Digraph;
use crate::pso::{self, PsoSettings};

/// Outcome of [`Network::train`] or [`Network::dtrain`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainReport {
    /// Mean of `node_errors`
    pub error: f64,
    /// Per-node mean squared error of the fitted model
    pub node_errors: Array1<f64>,
}

impl TrainReport {
    fn from_node_errors(node_errors: Array1<f64>) -> Self {
        let error = if node_errors.is_empty() {
            0.0
        } else {
            node_errors.sum() / node_errors.len() as f64
        };
        Self { error, node_errors }
    }
}

impl<C: RecurrentCell> Network<C> {
    /// Fits every parameter at once against the simulation error.
    ///
    /// The objective is the MSE between `target` and the trajectory
    /// simulated from `target`'s first time point. `pso.dim` is replaced by
    /// the model's dimensionality; everything else is used as given. The
    /// network is left holding the best parameters found.
    pub fn train(
        &mut self,
        target: &Dynamics,
        pso: &PsoSettings,
        graph: Option<&Digraph>,
    ) -> Result<TrainReport> {
        self.check_target(target, graph)?;
        let dim = match graph {
            Some(g) => C::dim_for_graph(g),
            None => C::dim_for_nodes(self.nodes()),
        };
        if dim == 0 {
            return Err(NetInfError::Config("model has no parameters".into()));
        }
        let settings = pso.clone().with_dim(dim);
        let x0 = target.row(0);
        let tpoints = target.tpoints();
        let template = self.clone();

        let objective = |vec: &[f64]| -> f64 {
            let mut candidate = template.clone();
            if candidate.set_from_vector(vec, graph, None).is_err() {
                return f64::INFINITY;
            }
            match candidate.simulate_from_state(x0, tpoints) {
                Ok(sim) if sim.is_finite() => sim.mse(target).unwrap_or(f64::INFINITY),
                _ => f64::INFINITY,
            }
        };
        let result = pso::solve(objective, &settings)?;

        self.set_from_vector(&result.gbest, graph, None)?;
        let fitted = self.simulate_from_state(x0, tpoints)?;
        let node_errors = fitted.mse_vector(target)?;
        debug!(dim, steps = result.steps, error = result.error, "trained network");
        Ok(TrainReport::from_node_errors(node_errors))
    }

    /// Decomposed training: one independent PSO problem per node.
    ///
    /// Node `i` minimizes the MSE of its one-step-ahead prediction
    /// ([`Network::predict_target`]) against column `i` of `target`, using
    /// seed `pso.seed + i`. The problems run in parallel and write only their
    /// own node's block, so the result does not depend on scheduling.
    pub fn dtrain(
        &mut self,
        target: &Dynamics,
        pso: &PsoSettings,
        graph: Option<&Digraph>,
    ) -> Result<TrainReport> {
        self.check_target(target, graph)?;
        let nodes = self.nodes();
        let template = self.clone();

        let fitted: Vec<(Vec<f64>, f64)> = (0..nodes)
            .into_par_iter()
            .map(|node| template.fit_node(node, target, pso, graph))
            .collect::<Result<_>>()?;

        let mut node_errors = Array1::zeros(nodes);
        for (node, (block, error)) in fitted.into_iter().enumerate() {
            self.set_from_vector(&block, graph, Some(node))?;
            node_errors[node] = error;
        }
        let report = TrainReport::from_node_errors(node_errors);
        debug!(nodes, error = report.error, "trained network by node");
        Ok(report)
    }

    /// Runs the PSO problem of one node and returns its best block and error
    fn fit_node(
        &self,
        node: usize,
        target: &Dynamics,
        pso: &PsoSettings,
        graph: Option<&Digraph>,
    ) -> Result<(Vec<f64>, f64)> {
        let dim = match graph {
            Some(g) => C::dim_for_node(node, g)?,
            None => C::dim_of_single_node(self.nodes()),
        };
        let settings = pso
            .clone()
            .with_dim(dim)
            .with_seed(pso.seed.wrapping_add(node as u64));
        let observed = target.column(node);

        let objective = |vec: &[f64]| -> f64 {
            let mut candidate = self.clone();
            if candidate.set_from_vector(vec, graph, Some(node)).is_err() {
                return f64::INFINITY;
            }
            match candidate.predict_target(target, node) {
                Ok(pred) if pred.is_finite() => series_mse(pred.column(0), observed),
                _ => f64::INFINITY,
            }
        };
        let result = pso::solve(objective, &settings)?;
        Ok((result.gbest, result.error))
    }

    fn check_target(&self, target: &Dynamics, graph: Option<&Digraph>) -> Result<()> {
        if target.vars() != self.nodes() {
            return Err(NetInfError::DimensionMismatch {
                expected: self.nodes(),
                found: target.vars(),
            });
        }
        if target.tpoints() == 0 {
            return Err(NetInfError::Config("training data has no time points".into()));
        }
        if let Some(g) = graph {
            g.check_indexed(self.nodes())?;
        }
        Ok(())
    }
}
