//! Tests for the PSO optimizer

use netinf::pso::benchmarks::{griewank, rastrigin, rosenbrock, sphere};
use netinf::pso::*;

#[test]
fn test_sphere_reaches_goal() {
    let settings = PsoSettings::sphere(10).with_steps(20_000).with_seed(1);
    let result = solve(sphere, &settings).unwrap();

    assert!(result.error <= settings.goal, "error {}", result.error);
    // early stop
    assert!(result.steps < settings.steps);
    assert_eq!(result.gbest.len(), 10);
    assert!((sphere(&result.gbest) - result.error).abs() < 1e-15);
}

#[test]
fn test_rosenbrock() {
    let settings = PsoSettings::rosenbrock(2).with_steps(5_000).with_seed(2);
    let result = solve(rosenbrock, &settings).unwrap();
    assert!(result.error < 1e-2, "error {}", result.error);
}

#[test]
fn test_griewank() {
    let settings = PsoSettings::griewank(2)
        .with_steps(5_000)
        .with_size(40)
        .with_seed(3);
    let result = solve(griewank, &settings).unwrap();
    assert!(result.error < 0.1, "error {}", result.error);
}

#[test]
fn test_rastrigin() {
    let settings = PsoSettings::rastrigin(2)
        .with_steps(5_000)
        .with_size(40)
        .with_seed(4);
    let result = solve(rastrigin, &settings).unwrap();
    assert!(result.error < 2.0, "error {}", result.error);
}

#[test]
fn test_same_seed_same_result() {
    let settings = PsoSettings::rastrigin(5).with_steps(300).with_seed(99);
    let a = solve(rastrigin, &settings).unwrap();
    let b = solve(rastrigin, &settings).unwrap();
    assert_eq!(a, b);

    let c = solve(rastrigin, &settings.clone().with_seed(100)).unwrap();
    assert_ne!(a.gbest, c.gbest);
}

#[test]
fn test_positions_stay_in_bounds() {
    let settings = PsoSettings::new(3)
        .with_bounds(-1.0, 1.0)
        .with_steps(200)
        .with_seed(5);
    // minimum outside the box: the best is pinned to the boundary
    let objective = |x: &[f64]| x.iter().map(|v| (v - 5.0).powi(2)).sum::<f64>();
    let result = solve(objective, &settings).unwrap();
    assert!(result.gbest.iter().all(|&v| (-1.0..=1.0).contains(&v)));
    assert!(result.gbest.iter().all(|&v| (v - 1.0).abs() < 1e-3));
}

#[test]
fn test_topologies_converge() {
    for strategy in [Neighborhood::Global, Neighborhood::Ring, Neighborhood::Random] {
        let settings = PsoSettings::sphere(2)
            .with_steps(3_000)
            .with_neighborhood(strategy, 3)
            .with_seed(6);
        let result = solve(sphere, &settings).unwrap();
        assert!(result.error <= settings.goal, "{:?}: {}", strategy, result.error);
    }
}

#[test]
fn test_constant_inertia() {
    let settings = PsoSettings::sphere(2)
        .with_steps(3_000)
        .with_inertia(InertiaStrategy::Constant, PSO_INERTIA, PSO_INERTIA)
        .with_seed(7);
    let result = solve(sphere, &settings).unwrap();
    assert!(result.error <= settings.goal);
}

#[test]
fn test_inertia_schedule() {
    let lin = InertiaStrategy::LinearDecreasing;
    assert!((lin.weight(0, 100, 0.7298, 0.3) - 0.7298).abs() < 1e-12);
    assert!((lin.weight(50, 100, 0.7298, 0.3) - 0.5149).abs() < 1e-12);
    assert_eq!(lin.weight(100, 100, 0.7298, 0.3), 0.3);
    assert_eq!(InertiaStrategy::Constant.weight(70, 100, 0.7, 0.3), 0.7);
}

#[test]
fn test_swarm_size() {
    assert_eq!(calc_swarm_size(4), 14);
    assert_eq!(calc_swarm_size(110), 30);
    assert_eq!(calc_swarm_size(1_000_000), PSO_MAX_SIZE);
    assert_eq!(PsoSettings::new(4).swarm_size(), 14);
    assert_eq!(PsoSettings::new(4).with_size(7).swarm_size(), 7);
}

#[test]
fn test_configuration_errors() {
    let bad = [
        PsoSettings::new(0),
        PsoSettings::new(2).with_size(0),
        PsoSettings::new(2).with_size(PSO_MAX_SIZE + 1),
        PsoSettings::new(2).with_bounds(1.0, 1.0),
        PsoSettings::new(2).with_bounds(2.0, -2.0),
        PsoSettings::new(2).with_steps(0),
        PsoSettings::new(2).with_neighborhood(Neighborhood::Ring, 0),
    ];
    for settings in bad.iter() {
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let objective = |x: &[f64]| {
            calls.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            sphere(x)
        };
        assert!(solve(objective, settings).is_err());
        assert_eq!(calls.into_inner(), 0);
    }
    let mut negative = PsoSettings::new(2);
    negative.c1 = -1.0;
    assert!(solve(sphere, &negative).is_err());
}

#[test]
fn test_swarm_steps_monotone() {
    let settings = PsoSettings::rosenbrock(3).with_steps(50).with_seed(8);
    let mut swarm = Swarm::new(settings, &rosenbrock).unwrap();
    let mut last = swarm.best();
    while !swarm.is_done() {
        swarm.step(&rosenbrock);
        assert!(swarm.best() <= last);
        last = swarm.best();
    }
    assert_eq!(swarm.step_count(), 50);
    assert_eq!(swarm.result().error, last);
}
