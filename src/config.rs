//! Run configuration for network inference.

use serde::{Deserialize, Serialize};

use crate::error::{NetInfError, Result};
use crate::graph::Edsf;
use crate::pso::PsoSettings;

/// How the ants build candidate graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphModel {
    /// Pheromone-guided roulette wheel per target
    #[default]
    Phero,
    /// Extended directed scale-free growth, pheromone ignored
    Edsf,
}

/// Recurrent model fitted to every candidate graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RnnType {
    #[default]
    Rnn,
    Drnn,
}

/// Prior desirability `eta[i, j]` of regulator `j` for target `i`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// Every candidate equally desirable
    #[default]
    Uniform,
    /// Absolute lagged Pearson correlation between regulator and target
    Correlation,
}

/// Settings of an inference run.
///
/// The value is read-only once the run starts; every entry point takes it by
/// reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed of the master random stream
    pub seed: u64,
    pub gmodel: GraphModel,
    pub rnn_type: RnnType,
    /// Train each node on its own (prediction error) instead of the whole
    /// network at once (simulation error)
    pub decomposition: bool,
    /// DRNN integration step
    pub delta_t: f64,

    /// Pheromone exponent
    pub aco_alpha: f64,
    /// Heuristic exponent
    pub aco_beta: f64,
    /// Number of generations
    pub aco_steps: usize,
    /// Ants per generation
    pub aco_ants: usize,
    /// Initial pheromone on every allowed edge
    pub aco_phero_val: f64,
    /// Evaporation rate
    pub aco_rho: f64,
    /// Deposit scale
    pub aco_lamda: f64,
    pub aco_self_loops: bool,
    /// Upper bound on regulators per target; `None` allows all candidates
    pub aco_max_regulators: Option<usize>,
    pub aco_heuristic: Heuristic,

    /// PSO steps per model fit
    pub pso_steps: usize,
    /// Log PSO progress
    pub print_pso: bool,
    pub pso_x_lo: f64,
    pub pso_x_hi: f64,
    pub pso_goal: f64,

    pub edsf_start_with: usize,
    pub edsf_alpha: f64,
    pub edsf_beta: f64,
    pub edsf_gamma: f64,
    pub edsf_delta_in: f64,
    pub edsf_delta_out: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,
            gmodel: GraphModel::Phero,
            rnn_type: RnnType::Rnn,
            decomposition: true,
            delta_t: 1.0,
            aco_alpha: 1.0,
            aco_beta: 1.0,
            aco_steps: 100,
            aco_ants: 10,
            aco_phero_val: 1.0,
            aco_rho: 0.1,
            aco_lamda: 1.0,
            aco_self_loops: true,
            aco_max_regulators: None,
            aco_heuristic: Heuristic::Uniform,
            pso_steps: 1000,
            print_pso: false,
            pso_x_lo: -20.0,
            pso_x_hi: 20.0,
            pso_goal: 1e-5,
            edsf_start_with: 1,
            edsf_alpha: 0.41,
            edsf_beta: 0.54,
            edsf_gamma: 0.05,
            edsf_delta_in: 0.2,
            edsf_delta_out: 0.0,
        }
    }
}

impl Settings {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_gmodel(mut self, gmodel: GraphModel) -> Self {
        self.gmodel = gmodel;
        self
    }

    pub fn with_rnn_type(mut self, rnn_type: RnnType) -> Self {
        self.rnn_type = rnn_type;
        self
    }

    pub fn with_decomposition(mut self, decomposition: bool) -> Self {
        self.decomposition = decomposition;
        self
    }

    pub fn with_delta_t(mut self, delta_t: f64) -> Self {
        self.delta_t = delta_t;
        self
    }

    /// Sets the pheromone and heuristic exponents
    pub fn with_exponents(mut self, alpha: f64, beta: f64) -> Self {
        self.aco_alpha = alpha;
        self.aco_beta = beta;
        self
    }

    /// Sets the number of generations and ants per generation
    pub fn with_colony(mut self, steps: usize, ants: usize) -> Self {
        self.aco_steps = steps;
        self.aco_ants = ants;
        self
    }

    /// Sets the initial value, evaporation rate and deposit scale
    pub fn with_pheromone(mut self, phero_val: f64, rho: f64, lamda: f64) -> Self {
        self.aco_phero_val = phero_val;
        self.aco_rho = rho;
        self.aco_lamda = lamda;
        self
    }

    pub fn with_self_loops(mut self, self_loops: bool) -> Self {
        self.aco_self_loops = self_loops;
        self
    }

    pub fn with_max_regulators(mut self, max_regulators: Option<usize>) -> Self {
        self.aco_max_regulators = max_regulators;
        self
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.aco_heuristic = heuristic;
        self
    }

    pub fn with_pso_steps(mut self, steps: usize) -> Self {
        self.pso_steps = steps;
        self
    }

    pub fn with_pso_bounds(mut self, x_lo: f64, x_hi: f64) -> Self {
        self.pso_x_lo = x_lo;
        self.pso_x_hi = x_hi;
        self
    }

    pub fn with_print_pso(mut self, print_pso: bool) -> Self {
        self.print_pso = print_pso;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.aco_rho) {
            return Err(NetInfError::Config(format!(
                "aco_rho must be in [0, 1], got {}",
                self.aco_rho
            )));
        }
        if self.aco_ants == 0 {
            return Err(NetInfError::Config("aco_ants must be > 0".to_string()));
        }
        if self.aco_steps == 0 {
            return Err(NetInfError::Config("aco_steps must be > 0".to_string()));
        }
        if !self.aco_phero_val.is_finite() || self.aco_phero_val < 0.0 {
            return Err(NetInfError::Config(format!(
                "aco_phero_val must be >= 0, got {}",
                self.aco_phero_val
            )));
        }
        for (name, value) in [("aco_alpha", self.aco_alpha), ("aco_beta", self.aco_beta)] {
            if !value.is_finite() || value < 0.0 {
                return Err(NetInfError::Config(format!(
                    "{} must be finite and >= 0, got {}",
                    name, value
                )));
            }
        }
        if !self.aco_lamda.is_finite() || self.aco_lamda < 0.0 {
            return Err(NetInfError::Config(format!(
                "aco_lamda must be >= 0, got {}",
                self.aco_lamda
            )));
        }
        if self.aco_max_regulators == Some(0) {
            return Err(NetInfError::Config(
                "aco_max_regulators must be > 0".to_string(),
            ));
        }
        if self.pso_steps == 0 {
            return Err(NetInfError::Config("pso_steps must be > 0".to_string()));
        }
        if !self.pso_x_lo.is_finite() || !self.pso_x_hi.is_finite() || self.pso_x_lo >= self.pso_x_hi
        {
            return Err(NetInfError::Config(format!(
                "pso_x_lo must be < pso_x_hi, got [{}, {}]",
                self.pso_x_lo, self.pso_x_hi
            )));
        }
        if self.delta_t <= 0.0 || !self.delta_t.is_finite() {
            return Err(NetInfError::Config(format!(
                "delta_t must be > 0, got {}",
                self.delta_t
            )));
        }
        let probs = [self.edsf_alpha, self.edsf_beta, self.edsf_gamma];
        if probs.iter().any(|p| !p.is_finite() || *p < 0.0)
            || (probs.iter().sum::<f64>() - 1.0).abs() > 1e-9
        {
            return Err(NetInfError::Config(format!(
                "edsf probabilities must be >= 0 and sum to 1, got ({}, {}, {})",
                self.edsf_alpha, self.edsf_beta, self.edsf_gamma
            )));
        }
        if self.edsf_start_with == 0 {
            return Err(NetInfError::Config(
                "edsf_start_with must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// PSO settings for one model fit of dimensionality `dim`
    pub fn pso_settings(&self, dim: usize) -> PsoSettings {
        PsoSettings::new(dim)
            .with_bounds(self.pso_x_lo, self.pso_x_hi)
            .with_steps(self.pso_steps)
            .with_goal(self.pso_goal)
            .with_seed(self.seed)
            .with_print_every(if self.print_pso { 100 } else { 0 })
    }

    /// eDSF generator for a network of `nodes` nodes
    pub fn edsf(&self, nodes: usize) -> Result<Edsf> {
        Edsf::new(
            nodes,
            self.edsf_start_with.min(nodes),
            self.edsf_alpha,
            self.edsf_beta,
            self.edsf_gamma,
            self.edsf_delta_in,
            self.edsf_delta_out,
        )
    }

    /// Load from JSON string; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
