//! # Particle Swarm Optimization
//!
//! Derivative-free minimizer over the box `[x_lo, x_hi]^dim`, used to fit
//! the parameters of the recurrent models.
//!
//! Each particle tracks its position, velocity and personal best. Per step
//! and per dimension:
//!
//! ```text
//! v = w·v + c1·U1·(pbest − x) + c2·U2·(lbest − x)
//! x = x + v
//! ```
//!
//! where `lbest` is the best personal best among the particle's informants
//! ([`Neighborhood`]) and `w` follows the [`InertiaStrategy`]. With
//! `clamp_pos`, coordinates leaving the box are set to the bound and their
//! velocity zeroed. A run stops after `steps` iterations or once the best
//! error reaches `goal`.
//!
//! ## Objectives
//!
//! Any `Fn(&[f64]) -> f64 + Sync`; the slice length is the dimensionality
//! and the closure captures whatever context it needs. Non-finite values
//! are treated as `+inf` and never become a best.
//!
//! ```rust
//! use netinf::pso::{self, benchmarks, PsoSettings};
//!
//! let settings = PsoSettings::sphere(4).with_steps(2000).with_seed(7);
//! let result = pso::solve(benchmarks::sphere, &settings).unwrap();
//! assert!(result.error <= settings.goal);
//! ```

pub mod benchmarks;
mod settings;
mod swarm;

pub use settings::{calc_swarm_size, InertiaStrategy, Neighborhood, PsoSettings};
pub use swarm::{PsoResult, Swarm};

use crate::error::Result;

/// Maximum swarm size
pub const PSO_MAX_SIZE: usize = 150;

/// Default inertia weight (Clerc & Kennedy 2002)
pub const PSO_INERTIA: f64 = 0.7298;

/// Minimizes `objective` with the given settings.
///
/// Configuration errors are reported before any evaluation. Failing to
/// reach `goal` is not an error.
pub fn solve<F>(objective: F, settings: &PsoSettings) -> Result<PsoResult>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    let mut swarm = Swarm::new(settings.clone(), &objective)?;
    Ok(swarm.run(&objective))
}
