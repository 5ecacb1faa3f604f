use rand::rngs::StdRng;

use super::{Digraph, NodeId};

/// Produces candidate topologies over the node ids `0..nodes()`
pub trait GraphGenerator: Send + Sync {
    /// Returns the number of nodes of every generated graph
    fn nodes(&self) -> usize;

    /// Draws one graph using the caller's random stream
    fn generate(&self, rng: &mut StdRng) -> Digraph;

    /// Upper bound on the number of edges a generated graph can hold
    fn max_edges(&self) -> usize {
        self.nodes() * self.nodes()
    }
}

/// Fully connected topology
#[derive(Clone, Debug)]
pub struct Complete {
    nodes: usize,
    self_loops: bool,
}

impl Complete {
    pub fn new(nodes: usize, self_loops: bool) -> Self {
        Self { nodes, self_loops }
    }

    /// Builds the complete digraph directly, without a random stream
    pub fn build(&self) -> Digraph {
        let mut graph = Digraph::with_nodes(self.nodes);
        for src in 0..self.nodes {
            for dest in 0..self.nodes {
                if src == dest && !self.self_loops {
                    continue;
                }
                graph.connect(NodeId(src), NodeId(dest));
            }
        }
        graph
    }
}

impl GraphGenerator for Complete {
    fn nodes(&self) -> usize {
        self.nodes
    }

    fn generate(&self, _rng: &mut StdRng) -> Digraph {
        self.build()
    }

    fn max_edges(&self) -> usize {
        if self.self_loops {
            self.nodes * self.nodes
        } else {
            self.nodes * self.nodes.saturating_sub(1)
        }
    }
}
