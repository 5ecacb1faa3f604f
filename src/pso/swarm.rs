use rand::prelude::*;
use rand::seq::index;
use rayon::prelude::*;
use tracing::{debug, trace};

use super::settings::{Neighborhood, PsoSettings};
use crate::error::Result;

/// Outcome of a PSO run
#[derive(Debug, Clone, PartialEq)]
pub struct PsoResult {
    /// Best fitness found
    pub error: f64,
    /// Position of the best fitness
    pub gbest: Vec<f64>,
    /// Number of steps performed
    pub steps: usize,
}

#[derive(Debug, Clone)]
struct Particle {
    position: Vec<f64>,
    velocity: Vec<f64>,
    best_position: Vec<f64>,
    best_fitness: f64,
}

/// Non-finite fitness counts as the worst possible value
#[inline]
fn sanitize(fitness: f64) -> f64 {
    if fitness.is_finite() {
        fitness
    } else {
        f64::INFINITY
    }
}

/// Particle swarm as a step-able state machine.
///
/// [`Swarm::new`] initialises and evaluates the swarm; each call to
/// [`Swarm::step`] performs one synchronous iteration. Every random draw
/// comes from the swarm's own seeded stream on the calling thread; only
/// fitness evaluation runs in parallel, so a run is reproducible for a
/// fixed seed.
pub struct Swarm {
    settings: PsoSettings,
    rng: StdRng,
    particles: Vec<Particle>,
    /// Informant indices per particle (unused for the global topology)
    informants: Vec<Vec<usize>>,
    gbest: Vec<f64>,
    best: f64,
    w: f64,
    step: usize,
}

impl Swarm {
    /// Validates the settings, scatters the particles and evaluates them
    pub fn new<F>(settings: PsoSettings, objective: &F) -> Result<Self>
    where
        F: Fn(&[f64]) -> f64 + Sync,
    {
        settings.validate()?;
        let size = settings.swarm_size();
        let dim = settings.dim;
        let (lo, hi) = (settings.x_lo, settings.x_hi);
        let mut rng = StdRng::seed_from_u64(settings.seed);

        let mut particles = Vec::with_capacity(size);
        for _ in 0..size {
            let position: Vec<f64> = (0..dim).map(|_| rng.gen_range(lo..hi)).collect();
            let velocity: Vec<f64> = position
                .iter()
                .map(|&x| (rng.gen_range(lo..hi) - x) / 2.0)
                .collect();
            particles.push(Particle {
                best_position: position.clone(),
                position,
                velocity,
                best_fitness: f64::INFINITY,
            });
        }

        let mut swarm = Self {
            informants: vec![Vec::new(); size],
            gbest: particles[0].position.clone(),
            best: f64::INFINITY,
            w: settings.w_max,
            step: 0,
            rng,
            particles,
            settings,
        };
        if swarm.settings.nhood_strategy == Neighborhood::Ring {
            swarm.informants = ring_informants(size, swarm.settings.nhood_size);
        }
        swarm.evaluate(objective);
        Ok(swarm)
    }

    pub fn best(&self) -> f64 {
        self.best
    }

    pub fn gbest(&self) -> &[f64] {
        &self.gbest
    }

    pub fn step_count(&self) -> usize {
        self.step
    }

    /// Current inertia weight
    pub fn inertia(&self) -> f64 {
        self.w
    }

    pub fn size(&self) -> usize {
        self.particles.len()
    }

    pub fn settings(&self) -> &PsoSettings {
        &self.settings
    }

    /// Step budget exhausted or goal reached
    pub fn is_done(&self) -> bool {
        self.step >= self.settings.steps || self.best <= self.settings.goal
    }

    /// Performs one iteration: velocity/position update, then evaluation
    pub fn step<F>(&mut self, objective: &F)
    where
        F: Fn(&[f64]) -> f64 + Sync,
    {
        let s = &self.settings;
        self.w = s
            .w_strategy
            .weight(self.step + 1, s.steps, s.w_max, s.w_min);

        if s.nhood_strategy == Neighborhood::Random {
            self.informants = random_informants(&mut self.rng, self.particles.len(), s.nhood_size);
        }
        let guides: Vec<Vec<f64>> = (0..self.particles.len())
            .map(|i| self.informant_best(i).to_vec())
            .collect();

        let (w, c1, c2) = (self.w, s.c1, s.c2);
        let (lo, hi, clamp) = (s.x_lo, s.x_hi, s.clamp_pos);
        for (particle, guide) in self.particles.iter_mut().zip(&guides) {
            for d in 0..particle.position.len() {
                let rho1: f64 = self.rng.gen();
                let rho2: f64 = self.rng.gen();
                let x = particle.position[d];
                particle.velocity[d] = w * particle.velocity[d]
                    + c1 * rho1 * (particle.best_position[d] - x)
                    + c2 * rho2 * (guide[d] - x);
                particle.position[d] += particle.velocity[d];

                if clamp {
                    if particle.position[d] < lo {
                        particle.position[d] = lo;
                        particle.velocity[d] = 0.0;
                    } else if particle.position[d] > hi {
                        particle.position[d] = hi;
                        particle.velocity[d] = 0.0;
                    }
                }
            }
        }

        self.evaluate(objective);
        self.step += 1;

        let every = self.settings.print_every;
        if every > 0 && self.step % every == 0 {
            debug!(step = self.step, w = self.w, error = self.best, "pso progress");
        }
    }

    /// Runs until [`Swarm::is_done`]
    pub fn run<F>(&mut self, objective: &F) -> PsoResult
    where
        F: Fn(&[f64]) -> f64 + Sync,
    {
        while !self.is_done() {
            self.step(objective);
        }
        trace!(steps = self.step, error = self.best, "pso finished");
        self.result()
    }

    pub fn result(&self) -> PsoResult {
        PsoResult {
            error: self.best,
            gbest: self.gbest.clone(),
            steps: self.step,
        }
    }

    /// Best personal-best position among the informants of particle `i`
    fn informant_best(&self, i: usize) -> &[f64] {
        if self.settings.nhood_strategy == Neighborhood::Global {
            return &self.gbest;
        }
        let mut best = i;
        for &j in &self.informants[i] {
            if self.particles[j].best_fitness < self.particles[best].best_fitness {
                best = j;
            }
        }
        &self.particles[best].best_position
    }

    /// Evaluates every particle in parallel, then updates the bests in order
    fn evaluate<F>(&mut self, objective: &F)
    where
        F: Fn(&[f64]) -> f64 + Sync,
    {
        let fitness: Vec<f64> = self
            .particles
            .par_iter()
            .map(|p| sanitize(objective(&p.position)))
            .collect();

        for (particle, f) in self.particles.iter_mut().zip(fitness) {
            if f < particle.best_fitness {
                particle.best_fitness = f;
                particle.best_position.copy_from_slice(&particle.position);
            }
            if f < self.best {
                self.best = f;
                self.gbest.copy_from_slice(&particle.position);
            }
        }
    }
}

/// `kappa` cyclic neighbours around each particle, split left/right
fn ring_informants(size: usize, kappa: usize) -> Vec<Vec<usize>> {
    let kappa = kappa.min(size.saturating_sub(1));
    let left = kappa / 2;
    let right = kappa - left;
    (0..size)
        .map(|i| {
            let mut nbrs = Vec::with_capacity(kappa);
            for k in 1..=left {
                nbrs.push((i + size - k) % size);
            }
            for k in 1..=right {
                nbrs.push((i + k) % size);
            }
            nbrs
        })
        .collect()
}

/// `kappa` distinct random informants per particle
fn random_informants(rng: &mut StdRng, size: usize, kappa: usize) -> Vec<Vec<usize>> {
    let kappa = kappa.min(size);
    (0..size)
        .map(|_| index::sample(rng, size, kappa).into_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_informants_wrap() {
        let informants = ring_informants(5, 2);
        assert_eq!(informants[0], vec![4, 1]);
        assert_eq!(informants[4], vec![3, 0]);

        // kappa larger than the swarm covers everyone else once
        let informants = ring_informants(3, 10);
        let mut first = informants[0].clone();
        first.sort();
        assert_eq!(first, vec![1, 2]);
    }

    #[test]
    fn test_random_informants_are_distinct() {
        let mut rng = StdRng::seed_from_u64(3);
        for nbrs in random_informants(&mut rng, 20, 5) {
            let mut sorted = nbrs.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), 5);
            assert!(sorted.iter().all(|&j| j < 20));
        }
    }

    #[test]
    fn test_last_step_uses_minimum_inertia() {
        let settings = PsoSettings::new(2)
            .with_steps(10)
            .with_goal(f64::NEG_INFINITY)
            .with_seed(4);
        let objective = |x: &[f64]| x[0] * x[0] + x[1] * x[1];
        let mut swarm = Swarm::new(settings, &objective).unwrap();
        assert_eq!(swarm.inertia(), swarm.settings().w_max);

        swarm.step(&objective);
        assert!(swarm.inertia() < swarm.settings().w_max);
        swarm.run(&objective);
        assert_eq!(swarm.step_count(), 10);
        assert_eq!(swarm.inertia(), swarm.settings().w_min);
    }

    #[test]
    fn test_nan_fitness_never_becomes_best() {
        let settings = PsoSettings::new(2).with_steps(20).with_seed(1);
        let objective = |x: &[f64]| if x[0] > 0.0 { f64::NAN } else { x[0] * x[0] + x[1] * x[1] };
        let result = Swarm::new(settings, &objective).unwrap().run(&objective);
        assert!(result.error.is_finite());
        assert!(result.gbest[0] <= 0.0);
    }
}
