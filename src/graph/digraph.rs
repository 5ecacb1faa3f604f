use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::GraphConfig;
use crate::error::{NetInfError, Result};

/// Opaque node identifier.
///
/// Networks built for a model with `N` variables use the ids `0..N`, so the
/// id doubles as the row/column index into weight matrices and trajectories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        NodeId(value)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Attribute map carried by nodes and edges (e.g. `{"weight": 0.5}`)
pub type Attrs = BTreeMap<String, Value>;

/// A directed edge `from -> to` (regulator -> target)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }
}

/// Directed graph with attributed nodes and edges.
///
/// Nodes keep their insertion order. Outgoing edges (with attributes) and
/// incoming edges are indexed separately so that successor, predecessor and
/// degree queries are single map lookups. Neighbour lists come back in
/// ascending id order. Parallel edges are not representable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Digraph {
    nodes: Vec<NodeId>,
    nattrs: HashMap<NodeId, Attrs>,
    outgoing: HashMap<NodeId, BTreeMap<NodeId, Attrs>>,
    incoming: HashMap<NodeId, BTreeSet<NodeId>>,
    edge_count: usize,
}

impl Digraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an edgeless graph with nodes `0..nodes`
    pub fn with_nodes(nodes: usize) -> Self {
        let mut graph = Self::new();
        for n in 0..nodes {
            graph.add_node(NodeId(n));
        }
        graph
    }

    /// Adds a node; returns `false` if it was already present
    pub fn add_node(&mut self, node: NodeId) -> bool {
        if self.has_node(node) {
            return false;
        }
        self.nodes.push(node);
        self.nattrs.insert(node, Attrs::new());
        self.outgoing.insert(node, BTreeMap::new());
        self.incoming.insert(node, BTreeSet::new());
        true
    }

    /// Adds a node (if needed) and merges `attrs` into its attribute map
    pub fn add_node_with_attrs(&mut self, node: NodeId, attrs: Attrs) {
        self.add_node(node);
        if let Some(existing) = self.nattrs.get_mut(&node) {
            existing.extend(attrs);
        }
    }

    /// Removes a node together with all its incident edges
    pub fn remove_node(&mut self, node: NodeId) -> Result<()> {
        self.require(node)?;
        self.remove_all_in_edges(node)?;
        self.remove_all_out_edges(node)?;
        self.nodes.retain(|&n| n != node);
        self.nattrs.remove(&node);
        self.outgoing.remove(&node);
        self.incoming.remove(&node);
        Ok(())
    }

    /// Adds the edge `src -> dest`; returns `false` if it already existed
    pub fn add_edge(&mut self, src: NodeId, dest: NodeId) -> Result<bool> {
        self.add_edge_with_attrs(src, dest, Attrs::new())
    }

    /// Adds the edge `src -> dest`, merging `attrs` into the edge attributes
    pub fn add_edge_with_attrs(
        &mut self,
        src: NodeId,
        dest: NodeId,
        attrs: Attrs,
    ) -> Result<bool> {
        self.require(src)?;
        self.require(dest)?;
        Ok(self.insert_edge(src, dest, attrs))
    }

    /// Adds the edge `src -> dest`, inserting whichever endpoint is missing.
    ///
    /// Used by generators, which draw endpoints from the nodes they just
    /// created. Returns `false` if the edge already existed.
    pub fn connect(&mut self, src: NodeId, dest: NodeId) -> bool {
        self.add_node(src);
        self.add_node(dest);
        self.insert_edge(src, dest, Attrs::new())
    }

    fn insert_edge(&mut self, src: NodeId, dest: NodeId, attrs: Attrs) -> bool {
        let targets = self.outgoing.entry(src).or_default();
        let created = !targets.contains_key(&dest);
        targets.entry(dest).or_default().extend(attrs);
        if created {
            self.incoming.entry(dest).or_default().insert(src);
            self.edge_count += 1;
        }
        created
    }

    /// Removes the edge `src -> dest`; returns `false` if it did not exist
    pub fn remove_edge(&mut self, src: NodeId, dest: NodeId) -> bool {
        let removed = self
            .outgoing
            .get_mut(&src)
            .map(|targets| targets.remove(&dest).is_some())
            .unwrap_or(false);
        if removed {
            if let Some(sources) = self.incoming.get_mut(&dest) {
                sources.remove(&src);
            }
            self.edge_count -= 1;
        }
        removed
    }

    pub fn remove_all_in_edges(&mut self, dest: NodeId) -> Result<()> {
        self.require(dest)?;
        for src in self.predecessors(dest) {
            self.remove_edge(src, dest);
        }
        Ok(())
    }

    pub fn remove_all_out_edges(&mut self, src: NodeId) -> Result<()> {
        self.require(src)?;
        for dest in self.successors(src) {
            self.remove_edge(src, dest);
        }
        Ok(())
    }

    pub fn remove_all_edges(&mut self) {
        for targets in self.outgoing.values_mut() {
            targets.clear();
        }
        for sources in self.incoming.values_mut() {
            sources.clear();
        }
        self.edge_count = 0;
    }

    pub fn update_node(&mut self, node: NodeId, key: &str, value: Value) -> Result<()> {
        self.nattrs
            .get_mut(&node)
            .ok_or(NetInfError::UnknownNode(node.0))?
            .insert(key.to_string(), value);
        Ok(())
    }

    pub fn update_edge(&mut self, edge: Edge, key: &str, value: Value) -> Result<()> {
        let attrs = self
            .outgoing
            .get_mut(&edge.from)
            .and_then(|targets| targets.get_mut(&edge.to))
            .ok_or_else(|| {
                NetInfError::InvalidGraph(format!("no edge {} -> {}", edge.from, edge.to))
            })?;
        attrs.insert(key.to_string(), value);
        Ok(())
    }

    pub fn node_attr(&self, name: &str, node: NodeId) -> Option<&Value> {
        self.nattrs.get(&node).and_then(|a| a.get(name))
    }

    pub fn node_attrs(&self, node: NodeId) -> Option<&Attrs> {
        self.nattrs.get(&node)
    }

    pub fn edge_attr(&self, name: &str, edge: Edge) -> Option<&Value> {
        self.edge_attrs(edge).and_then(|a| a.get(name))
    }

    pub fn edge_attrs(&self, edge: Edge) -> Option<&Attrs> {
        self.outgoing
            .get(&edge.from)
            .and_then(|targets| targets.get(&edge.to))
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// All edges, grouped by source in node insertion order
    pub fn edges(&self) -> Vec<Edge> {
        self.nodes
            .iter()
            .flat_map(|&src| {
                self.outgoing[&src]
                    .keys()
                    .map(move |&dest| Edge { from: src, to: dest })
            })
            .collect()
    }

    pub fn successors(&self, src: NodeId) -> Vec<NodeId> {
        self.outgoing
            .get(&src)
            .map(|targets| targets.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn predecessors(&self, dest: NodeId) -> Vec<NodeId> {
        self.incoming
            .get(&dest)
            .map(|sources| sources.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn in_degree(&self, dest: NodeId) -> usize {
        self.incoming.get(&dest).map_or(0, |s| s.len())
    }

    pub fn out_degree(&self, src: NodeId) -> usize {
        self.outgoing.get(&src).map_or(0, |t| t.len())
    }

    pub fn has_node(&self, node: NodeId) -> bool {
        self.nattrs.contains_key(&node)
    }

    pub fn has_edge(&self, edge: Edge) -> bool {
        self.edge_attrs(edge).is_some()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether every ordered pair is connected (self-loops included)
    pub fn is_complete(&self) -> bool {
        self.edge_count == self.nodes.len() * self.nodes.len()
    }

    /// Checks that the nodes are exactly `0..nodes`, as models require
    pub fn check_indexed(&self, nodes: usize) -> Result<()> {
        if self.node_count() != nodes {
            return Err(NetInfError::InvalidGraph(format!(
                "graph has {} nodes, model has {}",
                self.node_count(),
                nodes
            )));
        }
        match self.nodes.iter().find(|n| n.0 >= nodes) {
            Some(n) => Err(NetInfError::UnknownNode(n.0)),
            None => Ok(()),
        }
    }

    /// Adjacency matrix with `adj[[src, dest]] = 1` for each edge.
    ///
    /// Only valid for index-addressed graphs (see [`Digraph::check_indexed`]).
    pub fn to_adjacency(&self) -> Result<Array2<i32>> {
        let n = self.node_count();
        self.check_indexed(n)?;
        let mut adj = Array2::zeros((n, n));
        for edge in self.edges() {
            adj[[edge.from.0, edge.to.0]] = 1;
        }
        Ok(adj)
    }

    /// Builds a graph over `0..n` from a square adjacency matrix
    pub fn from_adjacency(adj: &Array2<i32>) -> Result<Self> {
        let (rows, cols) = adj.dim();
        if rows != cols {
            return Err(NetInfError::DimensionMismatch {
                expected: rows,
                found: cols,
            });
        }
        let mut graph = Self::with_nodes(rows);
        for ((src, dest), &v) in adj.indexed_iter() {
            if v != 0 {
                graph.add_edge(NodeId(src), NodeId(dest))?;
            }
        }
        Ok(graph)
    }

    /// Precision and recall of this graph's edges against a reference graph
    pub fn compare(&self, truth: &Digraph) -> EdgeScore {
        let predicted: BTreeSet<Edge> = self.edges().into_iter().collect();
        let actual: BTreeSet<Edge> = truth.edges().into_iter().collect();
        let hits = predicted.intersection(&actual).count();
        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
        EdgeScore {
            true_positives: hits,
            precision: ratio(hits, predicted.len()),
            recall: ratio(hits, actual.len()),
        }
    }

    fn require(&self, node: NodeId) -> Result<()> {
        if self.has_node(node) {
            Ok(())
        } else {
            Err(NetInfError::UnknownNode(node.0))
        }
    }
}

/// Edge-set agreement between an inferred and a reference graph
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeScore {
    pub true_positives: usize,
    pub precision: f64,
    pub recall: f64,
}

impl fmt::Display for Digraph {
    /// Nested-list description: `((node {attrs}) ...) ((src dest {attrs}) ...)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attrs = |a: &Attrs| serde_json::to_string(a).unwrap_or_default();
        write!(f, "(")?;
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "({} {})", node, attrs(&self.nattrs[node]))?;
        }
        write!(f, ") (")?;
        for (i, edge) in self.edges().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            let a = &self.outgoing[&edge.from][&edge.to];
            write!(f, "({} {} {})", edge.from, edge.to, attrs(a))?;
        }
        write!(f, ")")
    }
}

impl From<&Digraph> for GraphConfig {
    fn from(graph: &Digraph) -> Self {
        GraphConfig {
            nodes: graph
                .nodes
                .iter()
                .map(|n| (n.0, graph.nattrs[n].clone()))
                .collect(),
            edges: graph
                .edges()
                .into_iter()
                .map(|e| (e.from.0, e.to.0, graph.outgoing[&e.from][&e.to].clone()))
                .collect(),
        }
    }
}

impl From<Digraph> for GraphConfig {
    fn from(graph: Digraph) -> Self {
        GraphConfig::from(&graph)
    }
}

impl TryFrom<GraphConfig> for Digraph {
    type Error = NetInfError;

    fn try_from(config: GraphConfig) -> Result<Self> {
        let mut graph = Digraph::new();
        for (node, attrs) in config.nodes {
            graph.add_node_with_attrs(NodeId(node), attrs);
        }
        for (src, dest, attrs) in config.edges {
            graph.add_edge_with_attrs(NodeId(src), NodeId(dest), attrs)?;
        }
        Ok(graph)
    }
}

impl Serialize for Digraph {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        GraphConfig::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Digraph {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let config = GraphConfig::deserialize(deserializer)?;
        Digraph::try_from(config).map_err(serde::de::Error::custom)
    }
}
