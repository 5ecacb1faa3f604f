//! # netinf - Gene Regulatory Network Inference
//!
//! Infers a directed regulatory network and its dynamics from time-series
//! data. An ant colony searches over graph topologies; particle swarm
//! optimization fits a recurrent model to each candidate topology.
//!
//! ## Features
//!
//! - **PSO**: bounded derivative-free minimizer with global, ring and random
//!   neighbourhoods and constant or linearly decreasing inertia
//! - **RNN / DRNN**: discrete-time recurrent models, plain or with per-node
//!   decay time constants
//! - **Decomposed training**: one small PSO problem per node, run in parallel
//! - **ACO**: pheromone-guided graph construction or extended directed
//!   scale-free (eDSF) sampling
//! - **Digraph**: attributed directed graph with adjacency export/import
//!
//! ## Quick Start
//!
//! ```rust
//! use netinf::prelude::*;
//!
//! // Fit a 2-node RNN to a short trajectory
//! let data = Dynamics::parse("0.2 0.7\n0.6 0.4\n0.5 0.5\n").unwrap();
//! let mut network = Rnn::new(2);
//! let pso = PsoSettings::default().with_steps(200).with_seed(1);
//!
//! let report = network.train(&data, &pso, None).unwrap();
//! assert!(report.error < 0.1);
//! ```
//!
//! ## Network Inference
//!
//! ```ignore
//! use netinf::prelude::*;
//!
//! let data = Dynamics::parse(&std::fs::read_to_string("data")?)?;
//! let settings = Settings::from_json_str(&std::fs::read_to_string("settings.json")?)?;
//!
//! let solution = netinf(&data, &settings)?;
//! println!("{}", solution);
//! ```

pub mod activation;
pub mod aco;
pub mod cells;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod graph;
pub mod pso;
pub mod rnn;

pub use error::{NetInfError, Result};

pub mod prelude {
    pub use crate::aco::{netinf, Solution};
    pub use crate::activation::Sigmoid;
    pub use crate::cells::{DrnnCell, RecurrentCell, RnnCell};
    pub use crate::config::{GraphModel, Heuristic, RnnType, Settings};
    pub use crate::dynamics::Dynamics;
    pub use crate::graph::{Digraph, Edge, NodeId};
    pub use crate::pso::{PsoSettings, Swarm};
    pub use crate::rnn::{Drnn, Network, Rnn, TrainReport};
}
