use rand::prelude::*;

use super::base::GraphGenerator;
use super::{Digraph, NodeId};
use crate::error::{NetInfError, Result};

/// Random sparsity topology: a uniformly chosen subset of the candidate
/// edges, keeping `round(candidates * (1 - sparsity_level))` of them.
#[derive(Clone, Debug)]
pub struct Random {
    nodes: usize,
    sparsity_level: f64,
    self_loops: bool,
}

impl Random {
    pub fn new(nodes: usize, sparsity_level: f64, self_loops: bool) -> Result<Self> {
        if !(0.0..1.0).contains(&sparsity_level) {
            return Err(NetInfError::Config(format!(
                "sparsity level must be in range [0, 1), got {}",
                sparsity_level
            )));
        }
        Ok(Self {
            nodes,
            sparsity_level,
            self_loops,
        })
    }

    pub fn sparsity_level(&self) -> f64 {
        self.sparsity_level
    }
}

impl GraphGenerator for Random {
    fn nodes(&self) -> usize {
        self.nodes
    }

    fn generate(&self, rng: &mut StdRng) -> Digraph {
        let mut candidates: Vec<(usize, usize)> = Vec::with_capacity(self.max_edges());
        for src in 0..self.nodes {
            for dest in 0..self.nodes {
                if src == dest && !self.self_loops {
                    continue;
                }
                candidates.push((src, dest));
            }
        }
        let num_edges = (candidates.len() as f64 * (1.0 - self.sparsity_level)).round() as usize;

        let mut graph = Digraph::with_nodes(self.nodes);
        for &(src, dest) in candidates.choose_multiple(rng, num_edges) {
            graph.connect(NodeId(src), NodeId(dest));
        }
        graph
    }

    fn max_edges(&self) -> usize {
        if self.self_loops {
            self.nodes * self.nodes
        } else {
            self.nodes * self.nodes.saturating_sub(1)
        }
    }
}
