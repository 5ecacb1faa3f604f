//! # Recurrent Networks over Time Series
//!
//! [`Network`] wraps a [`RecurrentCell`](crate::cells::RecurrentCell) and
//! provides the sequence-level operations: free-running simulation,
//! one-step-ahead prediction and parameter fitting with PSO. **These are the
//! primary APIs most users should use.**
//!
//! ## Available Networks
//!
//! | Alias | Cell | Parameters |
//! |-------|------|------------|
//! | [`Rnn`] | [`RnnCell`](crate::cells::RnnCell) | `N·(N+1)` |
//! | [`Drnn`] | [`DrnnCell`](crate::cells::DrnnCell) | `N·(N+2)` |
//!
//! ## Quick Start
//!
//! ```rust
//! use ndarray::array;
//! use netinf::rnn::Rnn;
//!
//! // Neutral parameters: every node settles at sigmoid0(0) = 0.5
//! let network = Rnn::new(2);
//! let sim = network.simulate_from_state(array![0.1, 0.9].view(), 4).unwrap();
//!
//! assert_eq!(sim.tpoints(), 4);
//! assert_eq!(sim.value(0, 0), 0.1);
//! assert_eq!(sim.value(1, 3), 0.5);
//! ```
//!
//! ## Simulation vs Prediction
//!
//! | Operation | Input of step `t` | Error accumulates |
//! |-----------|-------------------|-------------------|
//! | [`Network::simulate_from_state`] | own output at `t` | Yes |
//! | [`Network::predict`] | observed row `t` | No |
//!
//! ## Training
//!
//! - [`Network::train`] fits all parameters in one PSO problem against the
//!   simulation error.
//! - [`Network::dtrain`] fits each node separately against its prediction
//!   error. Nodes are independent given the observed data, so the problems
//!   are smaller and run in parallel.
//!
//! Both accept an optional [`Digraph`](crate::graph::Digraph) restricting
//! which weights exist.

mod network;
mod training;

pub use network::Network;
pub use training::TrainReport;

use crate::cells::{DrnnCell, RnnCell};

/// Plain recurrent network
pub type Rnn = Network<RnnCell>;

/// Recurrent network with per-node decay time constants
pub type Drnn = Network<DrnnCell>;
