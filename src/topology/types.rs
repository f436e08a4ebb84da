//! Communication graph type.
//!
//! An undirected, integer-weighted graph over agents and transient decoy
//! nodes, stored in a `petgraph` stable graph so node handles stay valid when
//! victims and decoys are pruned.

use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use std::collections::HashMap;

use crate::agent::NodeId;

/// Undirected weighted communication graph
#[derive(Debug, Clone, Default)]
pub struct CommunicationGraph {
    graph: StableUnGraph<NodeId, u32>,
    index: HashMap<NodeId, NodeIndex>,
}

impl CommunicationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node; returns false if it was already present
    pub fn add_node(&mut self, node: NodeId) -> bool {
        if self.index.contains_key(&node) {
            return false;
        }
        let idx = self.graph.add_node(node.clone());
        self.index.insert(node, idx);
        true
    }

    /// Adds an edge between two existing nodes.
    ///
    /// Returns false for self-loops, unknown endpoints and pairs that are
    /// already linked; an existing edge keeps its weight.
    pub fn add_edge(&mut self, a: &NodeId, b: &NodeId, weight: u32) -> bool {
        let (Some(&ia), Some(&ib)) = (self.index.get(a), self.index.get(b)) else {
            return false;
        };
        if ia == ib || self.graph.find_edge(ia, ib).is_some() {
            return false;
        }
        self.graph.add_edge(ia, ib, weight);
        true
    }

    /// Removes a node and its incident edges; returns false if absent
    pub fn remove_node(&mut self, node: &NodeId) -> bool {
        match self.index.remove(node) {
            Some(idx) => {
                self.graph.remove_node(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, node: &NodeId) -> bool {
        self.index.contains_key(node)
    }

    pub fn has_edge(&self, a: &NodeId, b: &NodeId) -> bool {
        self.weight(a, b).is_some()
    }

    /// Weight of the edge between `a` and `b`, if linked
    pub fn weight(&self, a: &NodeId, b: &NodeId) -> Option<u32> {
        let (ia, ib) = (*self.index.get(a)?, *self.index.get(b)?);
        self.graph
            .find_edge(ia, ib)
            .and_then(|e| self.graph.edge_weight(e))
            .copied()
    }

    /// All nodes in storage order
    pub fn nodes(&self) -> Vec<&NodeId> {
        self.graph.node_indices().map(|i| &self.graph[i]).collect()
    }

    /// Neighbors of `node` in storage order; empty if the node is absent
    pub fn neighbors(&self, node: &NodeId) -> Vec<&NodeId> {
        let Some(&idx) = self.index.get(node) else {
            return Vec::new();
        };
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors(idx).collect();
        neighbors.sort();
        neighbors.into_iter().map(|i| &self.graph[i]).collect()
    }

    pub fn degree(&self, node: &NodeId) -> usize {
        self.index
            .get(node)
            .map_or(0, |&idx| self.graph.neighbors(idx).count())
    }

    /// All edges as `(a, b, weight)`
    pub fn edges(&self) -> Vec<(&NodeId, &NodeId, u32)> {
        self.graph
            .edge_references()
            .map(|e| (&self.graph[e.source()], &self.graph[e.target()], *e.weight()))
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Dense adjacency view: nodes in storage order and, for each, the
    /// positions of its neighbors in that same order
    pub fn adjacency(&self) -> (Vec<&NodeId>, Vec<Vec<usize>>) {
        let indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        let position: HashMap<NodeIndex, usize> =
            indices.iter().enumerate().map(|(i, &idx)| (idx, i)).collect();

        let nodes = indices.iter().map(|&i| &self.graph[i]).collect();
        let adjacency = indices
            .iter()
            .map(|&idx| {
                let mut nbrs: Vec<usize> = self
                    .graph
                    .neighbors(idx)
                    .map(|n| position[&n])
                    .collect();
                nbrs.sort_unstable();
                nbrs
            })
            .collect();

        (nodes, adjacency)
    }
}
