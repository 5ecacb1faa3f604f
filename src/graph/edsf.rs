//! Extended directed scale-free growth model.
//!
//! Reference: Bollobás, Borgs, Chayes, Riordan, "Directed scale-free
//! graphs", SODA 2003.
//!
//! Starting from `start_with` isolated nodes, each step performs one of:
//!
//! - with probability `alpha`: a new node `v` and an edge `v -> w`, `w`
//!   chosen with probability proportional to `in_degree(w) + delta_in`
//! - with probability `beta`: an edge `v -> w` between existing nodes, `v`
//!   proportional to `out_degree(v) + delta_out`, `w` as above
//! - with probability `gamma`: a new node `w` and an edge `v -> w`, `v`
//!   proportional to `out_degree(v) + delta_out`
//!
//! Growth stops once every node has been added. Node ids are assigned from a
//! shuffled permutation so that hubs are not biased towards low ids.

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use super::base::GraphGenerator;
use super::{Digraph, NodeId};
use crate::error::{NetInfError, Result};

/// Cap on growth steps, relative to the node count
const MAX_STEPS_PER_NODE: usize = 1000;

#[derive(Clone, Debug)]
pub struct Edsf {
    nodes: usize,
    start_with: usize,
    alpha: f64,
    beta: f64,
    gamma: f64,
    delta_in: f64,
    delta_out: f64,
}

impl Edsf {
    pub fn new(
        nodes: usize,
        start_with: usize,
        alpha: f64,
        beta: f64,
        gamma: f64,
        delta_in: f64,
        delta_out: f64,
    ) -> Result<Self> {
        if start_with == 0 || start_with > nodes {
            return Err(NetInfError::Config(format!(
                "eDSF start size {} must be in 1..={}",
                start_with, nodes
            )));
        }
        let probs = [alpha, beta, gamma];
        if probs.iter().any(|p| !p.is_finite() || *p < 0.0)
            || ((alpha + beta + gamma) - 1.0).abs() > 1e-9
        {
            return Err(NetInfError::Config(format!(
                "eDSF probabilities must be non-negative and sum to 1, got ({}, {}, {})",
                alpha, beta, gamma
            )));
        }
        if start_with < nodes && alpha + gamma <= 0.0 {
            return Err(NetInfError::Config(
                "eDSF model cannot grow with alpha + gamma = 0".into(),
            ));
        }
        if delta_in < 0.0 || delta_out < 0.0 {
            return Err(NetInfError::Config(format!(
                "eDSF degree offsets must be non-negative, got ({}, {})",
                delta_in, delta_out
            )));
        }
        Ok(Self {
            nodes,
            start_with,
            alpha,
            beta,
            gamma,
            delta_in,
            delta_out,
        })
    }

    /// Picks an existing node proportionally to `degree + delta`
    fn pick(
        graph: &Digraph,
        present: &[NodeId],
        delta: f64,
        incoming: bool,
        rng: &mut StdRng,
    ) -> NodeId {
        let weights = present.iter().map(|&n| {
            let degree = if incoming {
                graph.in_degree(n)
            } else {
                graph.out_degree(n)
            };
            degree as f64 + delta
        });
        match WeightedIndex::new(weights) {
            Ok(dist) => present[dist.sample(rng)],
            // all weights zero: no edges yet and no offset
            Err(_) => present[rng.gen_range(0..present.len())],
        }
    }
}

impl GraphGenerator for Edsf {
    fn nodes(&self) -> usize {
        self.nodes
    }

    fn generate(&self, rng: &mut StdRng) -> Digraph {
        let mut labels: Vec<usize> = (0..self.nodes).collect();
        labels.shuffle(rng);

        let mut graph = Digraph::with_nodes(self.nodes);
        let mut present: Vec<NodeId> = labels[..self.start_with].iter().map(|&l| NodeId(l)).collect();
        let mut next = self.start_with;

        let mut steps = 0;
        while next < self.nodes && steps < MAX_STEPS_PER_NODE * self.nodes {
            steps += 1;
            let r: f64 = rng.gen();
            if r < self.alpha {
                let w = Self::pick(&graph, &present, self.delta_in, true, rng);
                let v = NodeId(labels[next]);
                next += 1;
                present.push(v);
                graph.connect(v, w);
            } else if r < self.alpha + self.beta {
                let v = Self::pick(&graph, &present, self.delta_out, false, rng);
                let w = Self::pick(&graph, &present, self.delta_in, true, rng);
                graph.connect(v, w);
            } else if self.gamma > 0.0 {
                let v = Self::pick(&graph, &present, self.delta_out, false, rng);
                let w = NodeId(labels[next]);
                next += 1;
                present.push(w);
                graph.connect(v, w);
            }
        }
        graph
    }
}
