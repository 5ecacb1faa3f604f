use std::fmt;

use ndarray::{Array1, Array2};

use crate::graph::Digraph;

/// Pheromone trail per ordered node pair.
///
/// Rows are targets, columns are regulators: `tau[i, j]` is the trail on the
/// edge `j -> i`. Entries never go negative. Without self-loops the diagonal
/// stays at zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Pheromone {
    tau: Array2<f64>,
    self_loops: bool,
}

impl Pheromone {
    pub fn new(nodes: usize, initial: f64, self_loops: bool) -> Self {
        let mut tau = Array2::from_elem((nodes, nodes), initial.max(0.0));
        if !self_loops {
            tau.diag_mut().fill(0.0);
        }
        Self { tau, self_loops }
    }

    pub fn nodes(&self) -> usize {
        self.tau.nrows()
    }

    pub fn self_loops(&self) -> bool {
        self.self_loops
    }

    /// Trail on the edge `regulator -> target`
    #[inline]
    pub fn get(&self, target: usize, regulator: usize) -> f64 {
        self.tau[[target, regulator]]
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.tau
    }

    /// `tau *= 1 - rho`
    pub fn evaporate(&mut self, rho: f64) {
        let keep = (1.0 - rho).clamp(0.0, 1.0);
        self.tau.mapv_inplace(|t| t * keep);
    }

    /// Adds `lamda / (1 + errors[i])` to every edge `j -> i` of `graph`.
    ///
    /// Nodes with a non-finite error deposit nothing.
    pub fn deposit(&mut self, graph: &Digraph, errors: &Array1<f64>, lamda: f64) {
        for edge in graph.edges() {
            let (i, j) = (edge.to.index(), edge.from.index());
            if i >= self.nodes() || j >= self.nodes() || (i == j && !self.self_loops) {
                continue;
            }
            let error = errors.get(i).copied().unwrap_or(f64::INFINITY);
            if !error.is_finite() {
                continue;
            }
            let amount = lamda / (1.0 + error.max(0.0));
            if amount.is_finite() && amount > 0.0 {
                self.tau[[i, j]] += amount;
            }
        }
    }

    /// Selection weight `tau^alpha * eta^beta` of regulator `j` for target `i`
    #[inline]
    pub fn weight(&self, target: usize, regulator: usize, eta: f64, alpha: f64, beta: f64) -> f64 {
        let w = self.get(target, regulator).powf(alpha) * eta.powf(beta);
        if w.is_finite() {
            w.max(0.0)
        } else {
            0.0
        }
    }
}

impl fmt::Display for Pheromone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tau.outer_iter() {
            let line: Vec<String> = row.iter().map(|v| format!("{:.4}", v)).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeId;
    use ndarray::array;

    #[test]
    fn test_diagonal_without_self_loops() {
        let phero = Pheromone::new(3, 2.0, false);
        assert_eq!(phero.get(1, 1), 0.0);
        assert_eq!(phero.get(1, 0), 2.0);
    }

    #[test]
    fn test_deposit_scales_with_error() {
        let mut phero = Pheromone::new(2, 0.0, true);
        let mut graph = Digraph::with_nodes(2);
        graph.add_edge(NodeId(0), NodeId(1)).unwrap();
        graph.add_edge(NodeId(1), NodeId(0)).unwrap();
        phero.deposit(&graph, &array![f64::INFINITY, 1.0], 2.0);
        assert_eq!(phero.get(1, 0), 1.0);
        assert_eq!(phero.get(0, 1), 0.0);
    }
}
