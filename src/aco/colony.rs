use ndarray::Array2;
use rand::prelude::*;
use rayon::prelude::*;
use serde_json::Value;
use tracing::{info, warn};

use super::construct::{heuristic_matrix, PheromoneConstruction};
use super::pheromone::Pheromone;
use super::solution::Solution;
use crate::cells::RecurrentCell;
use crate::config::{GraphModel, Settings};
use crate::dynamics::Dynamics;
use crate::error::{NetInfError, Result};
use crate::graph::{Digraph, Edsf, GraphGenerator};
use crate::rnn::Network;

/// Ant colony over graph topologies, one generation per [`Colony::step`].
///
/// Each ant draws a graph, fits a network of the template's cell type to
/// it and reports the per-node errors. After all ants of a generation have
/// finished, the trail evaporates and the generation-best solution deposits
/// on its edges.
pub struct Colony<'a, C: RecurrentCell> {
    data: &'a Dynamics,
    settings: &'a Settings,
    template: C,
    pheromone: Pheromone,
    eta: Array2<f64>,
    edsf: Option<Edsf>,
    best: Solution,
    rng: StdRng,
    generation: usize,
}

impl<'a, C: RecurrentCell> Colony<'a, C> {
    /// `template` fixes the cell type and any cell-level setting (such as
    /// the DRNN time step); its parameters are ignored.
    pub fn new(data: &'a Dynamics, settings: &'a Settings, template: C) -> Result<Self> {
        settings.validate()?;
        let nodes = data.vars();
        if nodes == 0 || data.tpoints() == 0 {
            return Err(NetInfError::Config("training data is empty".into()));
        }
        if template.nodes() != nodes {
            return Err(NetInfError::DimensionMismatch {
                expected: nodes,
                found: template.nodes(),
            });
        }
        if !data.is_finite() {
            return Err(NetInfError::Config(
                "training data contains non-finite values".into(),
            ));
        }
        let edsf = match settings.gmodel {
            GraphModel::Edsf => Some(settings.edsf(nodes)?),
            GraphModel::Phero => None,
        };

        Ok(Self {
            data,
            settings,
            template,
            pheromone: Pheromone::new(nodes, settings.aco_phero_val, settings.aco_self_loops),
            eta: heuristic_matrix(data, settings.aco_heuristic),
            edsf,
            best: Solution::empty(nodes),
            rng: StdRng::seed_from_u64(settings.seed),
            generation: 0,
        })
    }

    pub fn best(&self) -> &Solution {
        &self.best
    }

    pub fn pheromone(&self) -> &Pheromone {
        &self.pheromone
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn is_done(&self) -> bool {
        self.generation >= self.settings.aco_steps
    }

    /// Runs one generation and returns its best solution
    pub fn step(&mut self) -> Result<Solution> {
        let seeds: Vec<u64> = (0..self.settings.aco_ants).map(|_| self.rng.gen()).collect();

        let generation_best = {
            let construction = PheromoneConstruction::new(
                &self.pheromone,
                &self.eta,
                self.settings.aco_alpha,
                self.settings.aco_beta,
                self.settings.aco_max_regulators,
            );
            let generator: &dyn GraphGenerator = match &self.edsf {
                Some(edsf) => edsf,
                None => &construction,
            };
            let ants: Vec<Solution> = seeds
                .par_iter()
                .enumerate()
                .map(|(ant, &seed)| self.run_ant(ant, generator, seed))
                .collect();

            let mut ants = ants.into_iter();
            let mut generation_best = ants.next().unwrap_or_else(|| Solution::empty(self.nodes()));
            for ant in ants {
                self.merge(&mut generation_best, &ant)?;
            }
            generation_best
        };

        self.pheromone.evaporate(self.settings.aco_rho);
        self.pheromone.deposit(
            generation_best.graph(),
            generation_best.errors(),
            self.settings.aco_lamda,
        );
        let mut best = std::mem::replace(&mut self.best, Solution::empty(0));
        self.merge(&mut best, &generation_best)?;
        self.best = best;
        self.generation += 1;

        info!(
            generation = self.generation,
            generation_error = generation_best.total_error(),
            best_error = self.best.total_error(),
            edges = self.best.graph().edge_count(),
            "aco generation"
        );
        Ok(generation_best)
    }

    /// Runs every remaining generation and returns the best solution
    pub fn run(mut self) -> Result<Solution> {
        while !self.is_done() {
            self.step()?;
        }
        Ok(self.best)
    }

    fn nodes(&self) -> usize {
        self.data.vars()
    }

    /// Per-node merge with decomposition, whole-solution replacement otherwise
    fn merge(&self, into: &mut Solution, other: &Solution) -> Result<()> {
        if self.settings.decomposition {
            into.update_with(other)?;
        } else {
            into.replace_if_better(other);
        }
        Ok(())
    }

    fn run_ant(&self, ant: usize, generator: &dyn GraphGenerator, seed: u64) -> Solution {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = generator.generate(&mut rng);
        match self.evaluate(graph.clone(), rng.gen()) {
            Ok(solution) => solution,
            Err(err) => {
                warn!(generation = self.generation, ant, error = %err, "ant evaluation failed");
                Solution::failed(graph, self.nodes())
            }
        }
    }

    /// Fits a network shaped to `graph` and labels each edge with its weight
    fn evaluate(&self, mut graph: Digraph, pso_seed: u64) -> Result<Solution> {
        let pso = self.settings.pso_settings(1).with_seed(pso_seed);
        let mut network = Network::from_cell(self.template.clone());
        network.reset();
        let report = if self.settings.decomposition {
            network.dtrain(self.data, &pso, Some(&graph))?
        } else {
            network.train(self.data, &pso, Some(&graph))?
        };

        let w = network.cell().w();
        for edge in graph.edges() {
            let weight = w[[edge.to.index(), edge.from.index()]];
            graph.update_edge(edge, "weight", Value::from(weight))?;
        }
        Solution::new(graph, report.node_errors)
    }
}
