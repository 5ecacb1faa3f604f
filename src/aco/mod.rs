//! # Ant Colony Network Inference
//!
//! Searches the space of regulatory graphs with an ant colony. Every ant
//! proposes a topology; a recurrent model restricted to that topology is
//! fitted with PSO, and the per-node errors score the proposal.
//!
//! ## Generation
//!
//! 1. Each ant draws a graph: pheromone roulette per target
//!    ([`PheromoneConstruction`]) or the scale-free growth model
//!    ([`Edsf`](crate::graph::Edsf)), depending on
//!    [`Settings::gmodel`](crate::config::Settings).
//! 2. Ants are evaluated in parallel, each from its own seeded stream.
//! 3. The trail evaporates, `tau *= 1 - rho`, and the generation-best
//!    solution deposits `lamda / (1 + e_i)` on every edge `j -> i`.
//! 4. The running best absorbs the generation best.
//!
//! With decomposition, node errors are independent of each other, so bests
//! are merged node by node ([`Solution::update_with`]); otherwise the whole
//! solution is compared on its mean error ([`Solution::replace_if_better`]).
//!
//! ## Example
//!
//! ```rust
//! use ndarray::array;
//! use netinf::aco::netinf;
//! use netinf::config::Settings;
//! use netinf::dynamics::Dynamics;
//!
//! let data = Dynamics::from_array(array![[0.1, 0.8], [0.6, 0.3], [0.4, 0.6], [0.5, 0.4]]);
//! let settings = Settings::default().with_colony(2, 3).with_pso_steps(20);
//!
//! let solution = netinf(&data, &settings).unwrap();
//! assert_eq!(solution.nodes(), 2);
//! assert!(solution.total_error().is_finite());
//! ```

mod colony;
mod construct;
mod pheromone;
mod solution;

pub use colony::Colony;
pub use construct::{heuristic_matrix, PheromoneConstruction, HEURISTIC_FLOOR};
pub use pheromone::Pheromone;
pub use solution::Solution;

use crate::cells::{DrnnCell, RecurrentCell, RnnCell};
use crate::config::{RnnType, Settings};
use crate::dynamics::Dynamics;
use crate::error::Result;

/// Infers a regulatory network from `data`.
///
/// Runs `aco_steps` generations of `aco_ants` ants and returns the best
/// solution found, its edges labelled with the fitted `"weight"`.
pub fn netinf(data: &Dynamics, settings: &Settings) -> Result<Solution> {
    let nodes = data.vars();
    match settings.rnn_type {
        RnnType::Rnn => Colony::new(data, settings, RnnCell::with_nodes(nodes))?.run(),
        RnnType::Drnn => {
            let template = DrnnCell::with_nodes(nodes).with_delta_t(settings.delta_t)?;
            Colony::new(data, settings, template)?.run()
        }
    }
}
