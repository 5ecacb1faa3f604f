use serde::{Deserialize, Serialize};

use super::{PSO_INERTIA, PSO_MAX_SIZE};
use crate::error::{NetInfError, Result};

/// Which particles inform a particle's velocity update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Neighborhood {
    /// Every particle is informed by the whole swarm
    Global,
    /// Fixed cyclic neighbours by particle index
    Ring,
    /// A fresh random subset every step
    /// (see <http://clerc.maurice.free.fr/pso/random_topology.pdf>)
    #[default]
    Random,
}

/// How the inertia weight evolves over the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InertiaStrategy {
    /// Always `w_max`
    Constant,
    /// From `w_max` at step 0 down to `w_min` at the last step
    #[default]
    LinearDecreasing,
}

impl InertiaStrategy {
    pub fn weight(self, step: usize, steps: usize, w_max: f64, w_min: f64) -> f64 {
        match self {
            InertiaStrategy::Constant => w_max,
            InertiaStrategy::LinearDecreasing => {
                let remaining = steps.saturating_sub(step) as f64;
                w_min + (w_max - w_min) * remaining / steps.max(1) as f64
            }
        }
    }
}

/// Swarm size for a problem of dimensionality `dim`: `10 + 2·sqrt(dim)`,
/// capped at [`PSO_MAX_SIZE`]
pub fn calc_swarm_size(dim: usize) -> usize {
    let size = 10 + (2.0 * (dim as f64).sqrt()) as usize;
    size.min(PSO_MAX_SIZE)
}

/// PSO configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsoSettings {
    /// Problem dimensionality
    pub dim: usize,
    /// Lower bound of every coordinate
    pub x_lo: f64,
    /// Upper bound of every coordinate
    pub x_hi: f64,
    /// Stop as soon as the best error is at or below this value
    pub goal: f64,
    /// Number of particles; `None` derives it from `dim`
    pub size: Option<usize>,
    /// Log progress every this many steps (0 disables)
    pub print_every: usize,
    /// Maximum number of iterations
    pub steps: usize,
    /// Cognitive coefficient
    pub c1: f64,
    /// Social coefficient
    pub c2: f64,
    pub w_max: f64,
    pub w_min: f64,
    /// Keep positions inside `[x_lo, x_hi]`
    pub clamp_pos: bool,
    pub nhood_strategy: Neighborhood,
    /// Neighbourhood size (kappa)
    pub nhood_size: usize,
    pub w_strategy: InertiaStrategy,
    pub seed: u64,
}

impl Default for PsoSettings {
    fn default() -> Self {
        Self {
            dim: 30,
            x_lo: -20.0,
            x_hi: 20.0,
            goal: 1e-5,
            size: None,
            print_every: 1000,
            steps: 100_000,
            c1: 1.496,
            c2: 1.496,
            w_max: PSO_INERTIA,
            w_min: 0.3,
            clamp_pos: true,
            nhood_strategy: Neighborhood::Random,
            nhood_size: 5,
            w_strategy: InertiaStrategy::LinearDecreasing,
            seed: 0,
        }
    }
}

impl PsoSettings {
    /// Default settings for a problem of dimensionality `dim`
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            ..Self::default()
        }
    }

    /// Sphere benchmark preset
    pub fn sphere(dim: usize) -> Self {
        Self::new(dim).with_bounds(-100.0, 100.0)
    }

    /// Rosenbrock benchmark preset
    pub fn rosenbrock(dim: usize) -> Self {
        Self::new(dim).with_bounds(-2.048, 2.048)
    }

    /// Griewank benchmark preset
    pub fn griewank(dim: usize) -> Self {
        Self::new(dim).with_bounds(-600.0, 600.0)
    }

    /// Rastrigin benchmark preset
    pub fn rastrigin(dim: usize) -> Self {
        Self::new(dim).with_bounds(-5.12, 5.12)
    }

    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }

    pub fn with_bounds(mut self, x_lo: f64, x_hi: f64) -> Self {
        self.x_lo = x_lo;
        self.x_hi = x_hi;
        self
    }

    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_goal(mut self, goal: f64) -> Self {
        self.goal = goal;
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_neighborhood(mut self, strategy: Neighborhood, size: usize) -> Self {
        self.nhood_strategy = strategy;
        self.nhood_size = size;
        self
    }

    pub fn with_inertia(mut self, strategy: InertiaStrategy, w_max: f64, w_min: f64) -> Self {
        self.w_strategy = strategy;
        self.w_max = w_max;
        self.w_min = w_min;
        self
    }

    pub fn with_print_every(mut self, print_every: usize) -> Self {
        self.print_every = print_every;
        self
    }

    /// Effective swarm size
    pub fn swarm_size(&self) -> usize {
        self.size.unwrap_or_else(|| calc_swarm_size(self.dim))
    }

    /// Rejects configurations that cannot run
    pub fn validate(&self) -> Result<()> {
        if self.dim == 0 {
            return Err(NetInfError::Config("PSO dimensionality must be positive".into()));
        }
        let size = self.swarm_size();
        if size == 0 || size > PSO_MAX_SIZE {
            return Err(NetInfError::Config(format!(
                "swarm size must be in 1..={}, got {}",
                PSO_MAX_SIZE, size
            )));
        }
        if !self.x_lo.is_finite() || !self.x_hi.is_finite() || self.x_lo >= self.x_hi {
            return Err(NetInfError::Config(format!(
                "degenerate bounds [{}, {}]",
                self.x_lo, self.x_hi
            )));
        }
        if self.steps == 0 {
            return Err(NetInfError::Config("PSO steps must be positive".into()));
        }
        if self.nhood_strategy != Neighborhood::Global && self.nhood_size == 0 {
            return Err(NetInfError::Config(
                "neighbourhood size must be positive for ring/random topologies".into(),
            ));
        }
        let coefficients = [self.c1, self.c2, self.w_max, self.w_min];
        if coefficients.iter().any(|c| !c.is_finite() || *c < 0.0) {
            return Err(NetInfError::Config(format!(
                "coefficients must be non-negative, got c1={} c2={} w_max={} w_min={}",
                self.c1, self.c2, self.w_max, self.w_min
            )));
        }
        if self.w_min > self.w_max {
            return Err(NetInfError::Config(format!(
                "w_min {} exceeds w_max {}",
                self.w_min, self.w_max
            )));
        }
        if self.goal.is_nan() {
            return Err(NetInfError::Config("PSO goal is NaN".into()));
        }
        Ok(())
    }
}
