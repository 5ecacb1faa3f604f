//! Tests for network simulation, prediction and training

use ndarray::{array, Array1};
use netinf::cells::{DrnnCell, RecurrentCell, RnnCell};
use netinf::dynamics::Dynamics;
use netinf::graph::{Digraph, NodeId};
use netinf::pso::PsoSettings;
use netinf::rnn::{Drnn, Network, Rnn};

/// Trajectory of a known 3-node network over 20 time points
fn ground_truth() -> (Rnn, Dynamics) {
    let w = array![[0.0, 2.0, -1.5], [-2.5, 0.5, 0.0], [1.0, -1.0, 1.2]];
    let b = array![-0.3, 0.8, -0.6];
    let network = Network::from_cell(RnnCell::from_parts(w, b).unwrap());
    let data = network
        .simulate_from_state(array![0.9, 0.1, 0.4].view(), 20)
        .unwrap();
    (network, data)
}

#[test]
fn test_network_creation() {
    let network = Rnn::new(4);
    assert_eq!(network.nodes(), 4);
    let drnn = Drnn::new(2);
    assert_eq!(drnn.cell().t(), &array![1.0, 1.0]);
}

#[test]
fn test_neutral_network_settles_at_half() {
    let mut network = Rnn::new(3);
    network.set_from_vector(&[0.7; 12], None, None).unwrap();
    network.reset();

    let sim = network
        .simulate_from_state(array![0.0, 1.0, 0.3].view(), 6)
        .unwrap();
    assert_eq!(sim.row(0), array![0.0, 1.0, 0.3]);
    for t in 1..6 {
        assert!(sim.row(t).iter().all(|&v| (v - 0.5).abs() < 1e-15));
    }

    // unit step with T = 1: the DRNN collapses onto the same fixed point
    let drnn = Drnn::new(3);
    let sim = drnn
        .simulate_from_state(array![0.0, 1.0, 0.3].view(), 4)
        .unwrap();
    assert!(sim.row(3).iter().all(|&v| (v - 0.5).abs() < 1e-12));
}

#[test]
fn test_simulate_shapes() {
    let network = Rnn::new(2);
    assert!(network.simulate_from_state(array![0.1].view(), 5).is_err());
    let sim = network.simulate_from_state(array![0.1, 0.2].view(), 0).unwrap();
    assert_eq!(sim.tpoints(), 0);
    let sim = network.simulate_from_state(array![0.1, 0.2].view(), 1).unwrap();
    assert_eq!(sim.row(0), array![0.1, 0.2]);
}

#[test]
fn test_predict_uses_observed_rows() {
    let (network, data) = ground_truth();
    let pred = network.predict(&data).unwrap();
    // the generating model predicts its own trajectory exactly
    assert!(pred.mse(&data).unwrap() < 1e-24);

    // on perturbed data the prediction of row t+1 only depends on row t
    let mut noisy = data.clone();
    noisy.set_value(0, 5, 0.0);
    let pred = network.predict(&noisy).unwrap();
    assert_eq!(pred.row(0), noisy.row(0));
    let expected = network.cell().update(1, noisy.row(5));
    assert_eq!(pred.value(1, 6), expected);

    let target = network.predict_target(&noisy, 1).unwrap();
    assert_eq!(target.vars(), 1);
    assert_eq!(target.column(0), pred.column(1));
    assert!(network.predict_target(&noisy, 3).is_err());
    assert!(network.predict(&Dynamics::new(2, 20)).is_err());
}

#[test]
fn test_dtrain_recovers_ground_truth() {
    let (_, data) = ground_truth();
    let mut network = Rnn::new(3);
    let pso = PsoSettings::default().with_steps(500).with_seed(11);

    let report = network.dtrain(&data, &pso, None).unwrap();
    assert!(report.error < 1e-4, "error {}", report.error);
    assert_eq!(report.node_errors.len(), 3);
    let mean = report.node_errors.sum() / 3.0;
    assert!((report.error - mean).abs() < 1e-15);

    // the fitted model reproduces the data one step ahead
    let pred = network.predict(&data).unwrap();
    assert!(pred.mse(&data).unwrap() < 1e-4);
    let errors = pred.mse_vector(&data).unwrap();
    for (fitted, reported) in errors.iter().zip(report.node_errors.iter()) {
        assert!((fitted - reported).abs() < 1e-12);
    }

    // free-running from the first observed state, errors compound over
    // 19 steps: allow 1e-3
    let sim = network
        .simulate_from_state(data.row(0), data.tpoints())
        .unwrap();
    let sim_error = sim.mse(&data).unwrap();
    assert!(sim_error < 1e-3, "simulation error {}", sim_error);
}

#[test]
fn test_dtrain_deterministic() {
    let (_, data) = ground_truth();
    let pso = PsoSettings::default().with_steps(60).with_seed(3);

    let mut a = Rnn::new(3);
    let mut b = Rnn::new(3);
    let ra = a.dtrain(&data, &pso, None).unwrap();
    let rb = b.dtrain(&data, &pso, None).unwrap();
    assert_eq!(ra, rb);
    assert_eq!(a, b);
}

#[test]
fn test_train_improves_on_neutral_model() {
    let (_, data) = ground_truth();
    let neutral = Rnn::new(3)
        .simulate_from_state(data.row(0), data.tpoints())
        .unwrap()
        .mse(&data)
        .unwrap();

    // free-running fits saturate easily; keep the weights moderate
    let mut network = Rnn::new(3);
    let pso = PsoSettings::default()
        .with_bounds(-3.0, 3.0)
        .with_steps(1000)
        .with_seed(5);
    let report = network.train(&data, &pso, None).unwrap();

    assert!(report.error < neutral, "{} vs {}", report.error, neutral);
    // the network keeps the best parameters
    let sim = network
        .simulate_from_state(data.row(0), data.tpoints())
        .unwrap();
    assert!((sim.mse(&data).unwrap() - report.error).abs() < 1e-12);
}

#[test]
fn test_graph_constrained_training() {
    let (_, data) = ground_truth();
    let mut graph = Digraph::with_nodes(3);
    graph.add_edge(NodeId(1), NodeId(0)).unwrap();
    graph.add_edge(NodeId(0), NodeId(2)).unwrap();

    let mut network = Rnn::new(3);
    let pso = PsoSettings::default().with_steps(100).with_seed(2);
    let report = network.dtrain(&data, &pso, Some(&graph)).unwrap();
    assert!(report.error.is_finite());

    let w = network.cell().w();
    for i in 0..3 {
        for j in 0..3 {
            let allowed = (j, i) == (1, 0) || (j, i) == (0, 2);
            if !allowed {
                assert_eq!(w[[i, j]], 0.0, "W[{}, {}]", i, j);
            }
        }
    }

    let bad = Digraph::with_nodes(4);
    assert!(network.dtrain(&data, &pso, Some(&bad)).is_err());
}

#[test]
fn test_drnn_training() {
    let (_, data) = ground_truth();
    let mut network: Network<DrnnCell> = Network::new(3);
    let pso = PsoSettings::default().with_steps(150).with_seed(9);

    let report = network.dtrain(&data, &pso, None).unwrap();
    assert!(report.error.is_finite());
    assert!(network.cell().t().iter().all(|&t| t >= 1.0));
    assert_eq!(report.node_errors, network.predict(&data).unwrap().mse_vector(&data).unwrap());
}

#[test]
fn test_from_vector() {
    let vec: Vec<f64> = (0..6).map(|v| v as f64).collect();
    let network = Rnn::from_vector(2, &vec, None).unwrap();
    assert_eq!(network.cell().b(), &Array1::from(vec![2.0, 5.0]));
    assert!(Rnn::from_vector(2, &vec[..5], None).is_err());
}
