//! PSO Benchmarks
//!
//! Minimizes the classic test functions with default swarm settings.
//! Run with `RUST_LOG=debug` to follow swarm progress.

use netinf::pso::benchmarks::{griewank, rastrigin, rosenbrock, sphere};
use netinf::pso::{solve, PsoSettings};

fn main() -> netinf::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== PSO Benchmarks ===\n");

    let dim = 10;
    let problems: [(&str, fn(&[f64]) -> f64, PsoSettings); 4] = [
        ("sphere", sphere, PsoSettings::sphere(dim)),
        ("rosenbrock", rosenbrock, PsoSettings::rosenbrock(dim)),
        ("griewank", griewank, PsoSettings::griewank(dim)),
        ("rastrigin", rastrigin, PsoSettings::rastrigin(dim)),
    ];

    for (name, objective, settings) in problems {
        let settings = settings.with_steps(20_000).with_seed(1);
        let result = solve(objective, &settings)?;
        println!(
            "{:<12} dim {:>3}  swarm {:>3}  steps {:>6}  error {:.3e}",
            name,
            dim,
            settings.swarm_size(),
            result.steps,
            result.error
        );
    }

    Ok(())
}
