//! Tests for ant colony network inference

use ndarray::{array, Array1, Array2};
use netinf::aco::*;
use netinf::cells::{RecurrentCell, RnnCell};
use netinf::config::{GraphModel, Heuristic, RnnType, Settings};
use netinf::dynamics::Dynamics;
use netinf::graph::{Digraph, Edge, GraphGenerator, NodeId};
use netinf::rnn::Network;
use rand::prelude::*;

/// Negative-feedback ring 0 -> 1 -> 2 -> 3 -| 0, which oscillates
fn ring_network() -> (Digraph, Dynamics) {
    let mut w = Array2::zeros((4, 4));
    w[[1, 0]] = 5.0;
    w[[2, 1]] = 5.0;
    w[[3, 2]] = 5.0;
    w[[0, 3]] = -5.0;
    let b = array![2.5, -2.5, -2.5, -2.5];
    let network = Network::from_cell(RnnCell::from_parts(w, b).unwrap());
    let data = network
        .simulate_from_state(array![0.9, 0.1, 0.6, 0.3].view(), 20)
        .unwrap();

    let mut truth = Digraph::with_nodes(4);
    for (src, dest) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
        truth.add_edge(NodeId(src), NodeId(dest)).unwrap();
    }
    (truth, data)
}

/// Share of generated graphs in which `regulator -> 0` is the only in-edge of node 0
fn frequencies(construction: &PheromoneConstruction<'_>, samples: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(21);
    let mut counts = vec![0usize; construction.nodes()];
    for _ in 0..samples {
        let graph = construction.generate(&mut rng);
        let regulators = graph.predecessors(NodeId(0));
        assert_eq!(regulators.len(), 1);
        counts[regulators[0].index()] += 1;
    }
    counts.iter().map(|&c| c as f64 / samples as f64).collect()
}

#[test]
fn test_pheromone_initialisation() {
    let phero = Pheromone::new(3, 0.5, true);
    assert!(phero.as_array().iter().all(|&t| t == 0.5));
    let phero = Pheromone::new(3, 0.5, false);
    assert!(phero.as_array().diag().iter().all(|&t| t == 0.0));
}

#[test]
fn test_pheromone_stays_non_negative() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut phero = Pheromone::new(5, 1.0, false);
    let errors = [0.0, 0.3, 7.5, f64::INFINITY, f64::NAN, 1e300];
    for _ in 0..2000 {
        phero.evaporate(rng.gen_range(0.0..=1.0));
        let mut graph = Digraph::with_nodes(5);
        for _ in 0..8 {
            let (src, dest) = (rng.gen_range(0..5), rng.gen_range(0..5));
            graph.add_edge(NodeId(src), NodeId(dest)).unwrap();
        }
        let e: Array1<f64> = (0..5).map(|_| *errors.choose(&mut rng).unwrap()).collect();
        phero.deposit(&graph, &e, rng.gen_range(0.0..3.0));

        assert!(phero.as_array().iter().all(|&t| t >= 0.0 && t.is_finite()));
        assert!(phero.as_array().diag().iter().all(|&t| t == 0.0));
    }
}

#[test]
fn test_evaporation_and_deposit() {
    let mut phero = Pheromone::new(2, 2.0, true);
    phero.evaporate(0.25);
    assert_eq!(phero.get(0, 1), 1.5);

    let mut graph = Digraph::with_nodes(2);
    graph.add_edge(NodeId(1), NodeId(0)).unwrap();
    phero.deposit(&graph, &array![3.0, 0.0], 2.0);
    // lamda / (1 + e_0) on the edge 1 -> 0 only
    assert_eq!(phero.get(0, 1), 2.0);
    assert_eq!(phero.get(1, 0), 1.5);
}

#[test]
fn test_construction_follows_weights() {
    // tau[0, .] = [1, 4, 1] and eta[0, .] = [1, 1, 4]
    let mut phero = Pheromone::new(3, 1.0, true);
    let mut graph = Digraph::with_nodes(3);
    graph.add_edge(NodeId(1), NodeId(0)).unwrap();
    phero.deposit(&graph, &array![0.0, 0.0, 0.0], 3.0);
    let mut eta = Array2::ones((3, 3));
    eta[[0, 2]] = 4.0;

    // pheromone only
    let construction = PheromoneConstruction::new(&phero, &eta, 1.0, 0.0, Some(1));
    let freq = frequencies(&construction, 6000);
    assert!((freq[1] - 4.0 / 6.0).abs() < 0.03, "{:?}", freq);
    assert!((freq[0] - 1.0 / 6.0).abs() < 0.03, "{:?}", freq);

    // heuristic only
    let construction = PheromoneConstruction::new(&phero, &eta, 0.0, 1.0, Some(1));
    let freq = frequencies(&construction, 6000);
    assert!((freq[2] - 4.0 / 6.0).abs() < 0.03, "{:?}", freq);
    assert!((freq[1] - 1.0 / 6.0).abs() < 0.03, "{:?}", freq);
}

#[test]
fn test_zero_weights_fall_back_to_uniform() {
    let phero = Pheromone::new(3, 0.0, true);
    let eta = Array2::ones((3, 3));
    let construction = PheromoneConstruction::new(&phero, &eta, 1.0, 1.0, Some(1));
    let freq = frequencies(&construction, 6000);
    assert!(freq.iter().all(|&f| (f - 1.0 / 3.0).abs() < 0.03), "{:?}", freq);
}

#[test]
fn test_solution_serializes() {
    let mut graph = Digraph::with_nodes(2);
    graph.add_edge(NodeId(0), NodeId(1)).unwrap();
    let solution = Solution::new(graph, array![0.5, 0.25]).unwrap();
    assert!((solution.total_error() - 0.375).abs() < 1e-12);

    let text = serde_json::to_string(&solution).unwrap();
    let restored: Solution = serde_json::from_str(&text).unwrap();
    assert_eq!(restored, solution);

    assert!(Solution::new(Digraph::with_nodes(3), array![0.5, 0.25]).is_err());

    // unsolved nodes carry +inf and must reload as such
    let empty = Solution::empty(4);
    let restored: Solution = serde_json::from_str(&serde_json::to_string(&empty).unwrap()).unwrap();
    assert_eq!(restored, empty);
    assert!(restored.errors().iter().all(|e| e.is_infinite()));
}

#[test]
fn test_solution_clear() {
    let (truth, _) = ring_network();
    let mut solution = Solution::new(truth, array![0.1, 0.1, 0.1, 0.1]).unwrap();
    solution.clear();
    assert_eq!(solution.graph().edge_count(), 0);
    assert_eq!(solution.graph().node_count(), 4);
    assert!(solution.errors().iter().all(|e| e.is_infinite()));
}

#[test]
fn test_colony_generation() {
    let (_, data) = ring_network();
    let settings = Settings::default()
        .with_colony(3, 4)
        .with_pso_steps(30)
        .with_self_loops(false)
        .with_seed(8);
    let mut colony = Colony::new(&data, &settings, RnnCell::with_nodes(4)).unwrap();

    let generation_best = colony.step().unwrap();
    assert_eq!(colony.generation(), 1);
    assert!(generation_best.total_error().is_finite());
    // the running best is never worse than any generation best, node by node
    for (best, current) in colony.best().errors().iter().zip(generation_best.errors().iter()) {
        assert!(best <= current);
    }
    assert!(colony.pheromone().as_array().diag().iter().all(|&t| t == 0.0));

    let before = colony.best().total_error();
    colony.step().unwrap();
    assert!(colony.best().total_error() <= before);
    for edge in colony.best().graph().edges() {
        assert_ne!(edge.from, edge.to);
        assert!(colony.best().graph().edge_attr("weight", edge).is_some());
    }
}

#[test]
fn test_colony_rejects_bad_input() {
    let (_, data) = ring_network();
    let settings = Settings::default();
    assert!(Colony::new(&data, &settings, RnnCell::with_nodes(3)).is_err());

    let mut nan = data.clone();
    nan.set_value(2, 4, f64::NAN);
    assert!(Colony::new(&nan, &settings, RnnCell::with_nodes(4)).is_err());

    let bad = Settings::default().with_colony(0, 5);
    assert!(netinf(&data, &bad).is_err());
}

#[test]
fn test_netinf_deterministic() {
    let (_, data) = ring_network();
    let settings = Settings::default()
        .with_colony(2, 3)
        .with_pso_steps(40)
        .with_seed(42);
    let a = netinf(&data, &settings).unwrap();
    let b = netinf(&data, &settings).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_netinf_whole_network_training() {
    let (_, data) = ring_network();
    let settings = Settings::default()
        .with_colony(2, 3)
        .with_pso_steps(40)
        .with_decomposition(false)
        .with_pso_bounds(-6.0, 6.0)
        .with_seed(1);
    let solution = netinf(&data, &settings).unwrap();
    assert_eq!(solution.nodes(), 4);
    assert!(solution.total_error().is_finite());
}

#[test]
fn test_netinf_drnn_and_edsf() {
    let (_, data) = ring_network();
    let settings = Settings::default()
        .with_colony(2, 3)
        .with_pso_steps(30)
        .with_rnn_type(RnnType::Drnn)
        .with_delta_t(0.5)
        .with_gmodel(GraphModel::Edsf)
        .with_seed(3);
    let solution = netinf(&data, &settings).unwrap();
    assert!(solution.total_error().is_finite());
    solution.graph().check_indexed(4).unwrap();
}

#[test]
fn test_netinf_recovers_ring() {
    let (truth, data) = ring_network();
    let settings = Settings::default()
        .with_colony(10, 5)
        .with_pso_steps(200)
        .with_seed(1);
    let solution = netinf(&data, &settings).unwrap();

    // a uniformly random guess scores precision 4/16 on this truth
    let score = solution.graph().compare(&truth);
    assert!(score.precision > 0.25, "{:?}", score);
    assert!(score.recall >= 0.75, "{:?}", score);
    assert!(solution.total_error() < 1e-3);
}

#[test]
fn test_correlation_heuristic_on_ring() {
    let (_, data) = ring_network();
    let eta = heuristic_matrix(&data, Heuristic::Correlation);
    assert_eq!(eta.dim(), (4, 4));
    assert!(eta.iter().all(|&e| e >= HEURISTIC_FLOOR && e <= 1.0 + 1e-12));

    let settings = Settings::default()
        .with_colony(2, 3)
        .with_pso_steps(30)
        .with_heuristic(Heuristic::Correlation)
        .with_max_regulators(Some(2));
    let solution = netinf(&data, &settings).unwrap();
    for node in 0..4 {
        assert!(solution.graph().in_degree(NodeId(node)) <= 2);
    }
}

#[test]
fn test_edge_weights_match_fit() {
    let (_, data) = ring_network();
    let settings = Settings::default()
        .with_colony(1, 2)
        .with_pso_steps(30)
        .with_seed(5);
    let solution = netinf(&data, &settings).unwrap();

    assert!(solution.graph().edge_count() > 0);
    for edge in solution.graph().edges() {
        let weight = solution
            .graph()
            .edge_attr("weight", Edge::new(edge.from, edge.to))
            .and_then(|v| v.as_f64())
            .unwrap();
        assert!(weight.is_finite());
        assert!(weight.abs() <= 20.0);
    }
}
