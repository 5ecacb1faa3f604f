//! Fit a Recurrent Model
//!
//! Simulates a known 3-node RNN, then recovers its parameters from the
//! trajectory with decomposed (per-node) training and whole-network training.

use ndarray::array;
use netinf::prelude::*;

fn main() -> netinf::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Fitting an RNN ===\n");

    let w = array![[0.0, 2.0, -1.5], [-2.5, 0.5, 0.0], [1.0, -1.0, 1.2]];
    let b = array![-0.3, 0.8, -0.6];
    let truth = Network::from_cell(RnnCell::from_parts(w, b)?);
    let data = truth.simulate_from_state(array![0.9, 0.1, 0.4].view(), 20)?;
    println!("Ground truth:\n{}\n", truth);

    let pso = PsoSettings::default().with_steps(500).with_seed(11);
    let mut network = Rnn::new(3);
    let report = network.dtrain(&data, &pso, None)?;
    println!("Decomposed training");
    println!("  node errors: {}", report.node_errors);
    println!("  mean error:  {:.3e}", report.error);
    println!("{}\n", network);

    let pso = pso.with_bounds(-3.0, 3.0).with_steps(1000);
    let mut network = Rnn::new(3);
    let report = network.train(&data, &pso, None)?;
    println!("Whole-network training");
    println!("  simulation error: {:.3e}", report.error);

    let mut drnn = Drnn::new(3);
    let report = drnn.dtrain(&data, &pso, None)?;
    println!("DRNN decomposed training");
    println!("  mean error: {:.3e}", report.error);
    println!("  time constants: {}", drnn.cell().t());

    Ok(())
}
