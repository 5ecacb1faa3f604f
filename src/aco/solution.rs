use std::fmt;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{NetInfError, Result};
use crate::graph::{Digraph, Edge, NodeId};

/// A candidate network and the error of every node after fitting.
///
/// The total error is the mean of the node errors. Non-finite node errors
/// are stored as `+inf` and serialized as `null`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    graph: Digraph,
    #[serde(with = "node_errors")]
    errors: Array1<f64>,
}

/// Node errors as a JSON list with `null` for unsolved (`+inf`) nodes
mod node_errors {
    use ndarray::Array1;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(errors: &Array1<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        let values: Vec<Option<f64>> = errors
            .iter()
            .map(|&e| if e.is_finite() { Some(e) } else { None })
            .collect();
        values.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Array1<f64>, D::Error> {
        let values = Vec::<Option<f64>>::deserialize(deserializer)?;
        Ok(values
            .into_iter()
            .map(|e| e.filter(|v| v.is_finite()).unwrap_or(f64::INFINITY))
            .collect())
    }
}

impl Solution {
    /// Pairs a graph over nodes `0..n` with its `n` node errors
    pub fn new(graph: Digraph, errors: Array1<f64>) -> Result<Self> {
        graph.check_indexed(errors.len())?;
        let errors = errors.mapv(|e| if e.is_finite() { e } else { f64::INFINITY });
        Ok(Self { graph, errors })
    }

    /// Edgeless graph with every node error at `+inf`
    pub fn empty(nodes: usize) -> Self {
        Self {
            graph: Digraph::with_nodes(nodes),
            errors: Array1::from_elem(nodes, f64::INFINITY),
        }
    }

    /// Keeps the graph but marks every node as failed
    pub(crate) fn failed(graph: Digraph, nodes: usize) -> Self {
        Self {
            graph,
            errors: Array1::from_elem(nodes, f64::INFINITY),
        }
    }

    pub fn graph(&self) -> &Digraph {
        &self.graph
    }

    pub fn errors(&self) -> &Array1<f64> {
        &self.errors
    }

    pub fn nodes(&self) -> usize {
        self.errors.len()
    }

    pub fn total_error(&self) -> f64 {
        if self.errors.is_empty() {
            return 0.0;
        }
        self.errors.sum() / self.errors.len() as f64
    }

    /// Per-node merge: node `i` takes `other`'s in-edges and error when
    /// `other`'s error on `i` is strictly lower. Returns how many nodes changed.
    pub fn update_with(&mut self, other: &Solution) -> Result<usize> {
        if other.nodes() != self.nodes() {
            return Err(NetInfError::DimensionMismatch {
                expected: self.nodes(),
                found: other.nodes(),
            });
        }
        let mut replaced = 0;
        for i in 0..self.nodes() {
            if other.errors[i] >= self.errors[i] {
                continue;
            }
            let target = NodeId(i);
            self.graph.remove_all_in_edges(target)?;
            for src in other.graph.predecessors(target) {
                let attrs = other
                    .graph
                    .edge_attrs(Edge::new(src, target))
                    .cloned()
                    .unwrap_or_default();
                self.graph.add_edge_with_attrs(src, target, attrs)?;
            }
            self.errors[i] = other.errors[i];
            replaced += 1;
        }
        Ok(replaced)
    }

    /// Replaces the whole solution when `other`'s total error is strictly lower
    pub fn replace_if_better(&mut self, other: &Solution) -> bool {
        if other.total_error() < self.total_error() {
            *self = other.clone();
            true
        } else {
            false
        }
    }

    /// Drops every edge and resets every node error to `+inf`
    pub fn clear(&mut self) {
        self.graph.remove_all_edges();
        self.errors.fill(f64::INFINITY);
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.graph)?;
        let errors: Vec<String> = self.errors.iter().map(|e| format!("{:.5e}", e)).collect();
        write!(f, "{}", errors.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn graph_with(edges: &[(usize, usize)]) -> Digraph {
        let mut graph = Digraph::with_nodes(3);
        for &(s, d) in edges {
            graph.add_edge(NodeId(s), NodeId(d)).unwrap();
        }
        graph
    }

    #[test]
    fn test_update_with_merges_per_node() {
        let mut best = Solution::new(graph_with(&[(0, 1), (2, 0)]), array![0.5, 0.5, 0.5]).unwrap();
        let other = Solution::new(graph_with(&[(2, 1), (1, 0)]), array![0.9, 0.1, 0.5]).unwrap();

        assert_eq!(best.update_with(&other).unwrap(), 1);
        assert_eq!(best.errors(), &array![0.5, 0.1, 0.5]);
        // node 1 takes the competitor's regulators, node 0 keeps its own
        assert_eq!(best.graph().predecessors(NodeId(1)), vec![NodeId(2)]);
        assert_eq!(best.graph().predecessors(NodeId(0)), vec![NodeId(2)]);
    }

    #[test]
    fn test_replace_if_better_is_strict() {
        let mut best = Solution::new(graph_with(&[(0, 1)]), array![1.0, 1.0, 1.0]).unwrap();
        let tie = Solution::new(graph_with(&[(1, 2)]), array![0.5, 1.5, 1.0]).unwrap();
        assert!(!best.replace_if_better(&tie));
        let better = Solution::new(graph_with(&[(1, 2)]), array![0.5, 0.5, 1.0]).unwrap();
        assert!(best.replace_if_better(&better));
        assert_eq!(best.graph().edge_count(), 1);
        assert!(best.graph().has_edge(Edge::new(NodeId(1), NodeId(2))));
    }

    #[test]
    fn test_non_finite_errors_become_infinite() {
        let solution = Solution::new(Digraph::with_nodes(2), array![f64::NAN, 0.0]).unwrap();
        assert_eq!(solution.errors()[0], f64::INFINITY);
        assert_eq!(solution.total_error(), f64::INFINITY);
    }

    #[test]
    fn test_unsolved_nodes_survive_json() {
        let empty = Solution::empty(2);
        let text = serde_json::to_string(&empty).unwrap();
        assert!(text.contains("[null,null]"));
        let restored: Solution = serde_json::from_str(&text).unwrap();
        assert_eq!(restored, empty);

        let partial = Solution::new(graph_with(&[(0, 1)]), array![0.25, f64::INFINITY, 1.5]).unwrap();
        let text = serde_json::to_string(&partial).unwrap();
        let restored: Solution = serde_json::from_str(&text).unwrap();
        assert_eq!(restored.errors()[1], f64::INFINITY);
        assert_eq!(restored, partial);
    }
}
