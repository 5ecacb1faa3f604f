//! Pheromone-guided graph construction.

use ndarray::{s, Array2, ArrayView1};
use rand::prelude::*;

use super::pheromone::Pheromone;
use crate::config::Heuristic;
use crate::dynamics::Dynamics;
use crate::graph::{Digraph, GraphGenerator, NodeId};

/// Lower bound of every heuristic entry, so that no edge becomes impossible
pub const HEURISTIC_FLOOR: f64 = 1e-3;

/// Heuristic matrix `eta` (target rows, regulator columns) for `data`
pub fn heuristic_matrix(data: &Dynamics, heuristic: Heuristic) -> Array2<f64> {
    let n = data.vars();
    match heuristic {
        Heuristic::Uniform => Array2::ones((n, n)),
        Heuristic::Correlation => {
            let t = data.tpoints();
            let mut eta = Array2::from_elem((n, n), HEURISTIC_FLOOR);
            if t < 3 {
                return eta;
            }
            let values = data.as_array();
            for i in 0..n {
                let target = values.slice(s![1.., i]);
                for j in 0..n {
                    let regulator = values.slice(s![..t - 1, j]);
                    let r = pearson(regulator, target).abs();
                    if r.is_finite() {
                        eta[[i, j]] = r.max(HEURISTIC_FLOOR);
                    }
                }
            }
            eta
        }
    }
}

/// Pearson correlation; NaN when either series is constant
fn pearson(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    let n = a.len() as f64;
    let (ma, mb) = (a.sum() / n, b.sum() / n);
    let mut cov = 0.0;
    let mut va = 0.0;
    let mut vb = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let (dx, dy) = (x - ma, y - mb);
        cov += dx * dy;
        va += dx * dx;
        vb += dy * dy;
    }
    cov / (va * vb).sqrt()
}

/// Builds one graph per call from a pheromone snapshot.
///
/// For every target `i`, `k ~ U{1..=max_regulators}` regulators are drawn
/// by roulette wheel without replacement, with weights
/// `tau[i, j]^alpha * eta[i, j]^beta`. When every remaining weight is zero
/// the draw is uniform.
#[derive(Clone, Debug)]
pub struct PheromoneConstruction<'a> {
    pheromone: &'a Pheromone,
    eta: &'a Array2<f64>,
    alpha: f64,
    beta: f64,
    max_regulators: Option<usize>,
}

impl<'a> PheromoneConstruction<'a> {
    pub fn new(
        pheromone: &'a Pheromone,
        eta: &'a Array2<f64>,
        alpha: f64,
        beta: f64,
        max_regulators: Option<usize>,
    ) -> Self {
        Self {
            pheromone,
            eta,
            alpha,
            beta,
            max_regulators,
        }
    }

    /// Candidate regulators of `target`
    fn candidates(&self, target: usize) -> Vec<usize> {
        (0..self.nodes())
            .filter(|&j| j != target || self.pheromone.self_loops())
            .collect()
    }

    fn regulators_of(&self, target: usize, rng: &mut StdRng) -> Vec<usize> {
        let mut candidates = self.candidates(target);
        if candidates.is_empty() {
            return Vec::new();
        }
        let limit = self
            .max_regulators
            .unwrap_or(candidates.len())
            .clamp(1, candidates.len());
        let k = rng.gen_range(1..=limit);

        let mut weights: Vec<f64> = candidates
            .iter()
            .map(|&j| {
                self.pheromone
                    .weight(target, j, self.eta[[target, j]], self.alpha, self.beta)
            })
            .collect();

        let mut chosen = Vec::with_capacity(k);
        for _ in 0..k {
            let idx = roulette(&weights, rng);
            chosen.push(candidates.swap_remove(idx));
            weights.swap_remove(idx);
        }
        chosen.sort_unstable();
        chosen
    }
}

/// Index drawn with probability proportional to `weights`, uniform if they
/// are all zero
fn roulette(weights: &[f64], rng: &mut StdRng) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return rng.gen_range(0..weights.len());
    }
    let mut pick = rng.gen::<f64>() * total;
    for (idx, &w) in weights.iter().enumerate() {
        if pick < w {
            return idx;
        }
        pick -= w;
    }
    // rounding left `pick` past the end: take the last non-zero weight
    weights.iter().rposition(|&w| w > 0.0).unwrap_or(weights.len() - 1)
}

impl GraphGenerator for PheromoneConstruction<'_> {
    fn nodes(&self) -> usize {
        self.pheromone.nodes()
    }

    fn generate(&self, rng: &mut StdRng) -> Digraph {
        let mut graph = Digraph::with_nodes(self.nodes());
        for target in 0..self.nodes() {
            for regulator in self.regulators_of(target, rng) {
                graph.connect(NodeId(regulator), NodeId(target));
            }
        }
        graph
    }

    fn max_edges(&self) -> usize {
        let n = self.nodes();
        if self.pheromone.self_loops() {
            n * n
        } else {
            n * n.saturating_sub(1)
        }
    }
}
