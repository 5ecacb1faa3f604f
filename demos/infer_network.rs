//! Network Inference
//!
//! Usage: `infer_network [DATA [SETTINGS]]`
//!
//! DATA is a whitespace-separated trajectory (one time point per line),
//! SETTINGS a JSON file of run settings. Without arguments a 4-node
//! oscillating ring is simulated and inferred.

use std::env;
use std::fs;

use ndarray::{array, Array2};
use netinf::prelude::*;

fn ring() -> netinf::Result<(Digraph, Dynamics)> {
    let mut w = Array2::zeros((4, 4));
    w[[1, 0]] = 5.0;
    w[[2, 1]] = 5.0;
    w[[3, 2]] = 5.0;
    w[[0, 3]] = -5.0;
    let b = array![2.5, -2.5, -2.5, -2.5];
    let network = Network::from_cell(RnnCell::from_parts(w, b)?);
    let data = network.simulate_from_state(array![0.9, 0.1, 0.6, 0.3].view(), 20)?;

    let mut truth = Digraph::with_nodes(4);
    for (src, dest) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
        truth.add_edge(NodeId(src), NodeId(dest))?;
    }
    Ok((truth, data))
}

fn read(path: &str) -> netinf::Result<String> {
    fs::read_to_string(path)
        .map_err(|e| netinf::NetInfError::Parse(format!("cannot read {}: {}", path, e)))
}

fn main() -> netinf::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (truth, data) = match args.first() {
        Some(path) => (None, Dynamics::parse(&read(path)?)?),
        None => {
            let (truth, data) = ring()?;
            (Some(truth), data)
        }
    };
    let settings = match args.get(1) {
        Some(path) => Settings::from_json_str(&read(path)?)?,
        None => Settings::default()
            .with_colony(10, 5)
            .with_pso_steps(200)
            .with_seed(1),
    };

    println!("=== Network Inference ===\n");
    println!("{} genes, {} time points", data.vars(), data.tpoints());
    println!("{}\n", settings.to_json_string()?);

    let solution = netinf(&data, &settings)?;
    println!("Best solution:\n{}\n", solution);

    for edge in solution.graph().edges() {
        let weight = solution
            .graph()
            .edge_attr("weight", edge)
            .and_then(|v| v.as_f64())
            .unwrap_or(f64::NAN);
        println!("  {} -> {}  w = {:+.3}", edge.from.index(), edge.to.index(), weight);
    }

    if let Some(truth) = truth {
        let score = solution.graph().compare(&truth);
        println!("\nprecision {:.2}  recall {:.2}", score.precision, score.recall);
    }

    Ok(())
}
