//! Structural centrality metrics.
//!
//! Computes four per-node scores over an immutable graph snapshot using the
//! customary normalizations of general-purpose graph libraries:
//!
//! - **Degree**: `deg(v) / (n - 1)`; every node scores 1 when `n <= 1`.
//! - **Betweenness**: Brandes' algorithm over unweighted shortest paths,
//!   scaled by `1 / ((n - 1)(n - 2))` when `n > 2`.
//! - **Closeness**: `(r - 1) / sum(d)` over the `r` nodes reachable from `v`,
//!   scaled by `(r - 1) / (n - 1)` so small components are not favored.
//! - **Eigenvector**: power iteration on `A + I` with L2 normalization and a
//!   convergence tolerance of `1e-6 * n`. This is the only metric that can
//!   fail; see [`ConvergenceFailure`].
//!
//! Edge weights are ignored by every metric.

use log::warn;
use std::collections::{HashMap, VecDeque};

use crate::agent::NodeId;
use crate::topology::CommunicationGraph;

/// Per-node convergence tolerance of the eigenvector power iteration
const EIGENVECTOR_TOLERANCE: f64 = 1.0e-6;

/// Eigenvector power iteration did not settle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("eigenvector centrality failed to converge within {max_iter} iterations over {node_count} nodes")]
pub struct ConvergenceFailure {
    pub max_iter: usize,
    pub node_count: usize,
}

/// The four scores of a single node
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeCentrality {
    pub degree: f64,
    pub betweenness: f64,
    pub closeness: f64,
    pub eigenvector: f64,
}

/// Centrality scores of every node of one graph snapshot
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CentralityScores {
    pub degree: HashMap<NodeId, f64>,
    pub betweenness: HashMap<NodeId, f64>,
    pub closeness: HashMap<NodeId, f64>,
    /// Empty when the power iteration failed
    pub eigenvector: HashMap<NodeId, f64>,
    pub eigenvector_failure: Option<ConvergenceFailure>,
}

impl CentralityScores {
    /// Scores of `node`; missing entries read as 0
    pub fn get(&self, node: &NodeId) -> NodeCentrality {
        let lookup = |map: &HashMap<NodeId, f64>| map.get(node).copied().unwrap_or(0.0);
        NodeCentrality {
            degree: lookup(&self.degree),
            betweenness: lookup(&self.betweenness),
            closeness: lookup(&self.closeness),
            eigenvector: lookup(&self.eigenvector),
        }
    }
}

/// Evaluates all four metrics for a graph snapshot
#[derive(Debug, Clone, Copy)]
pub struct CentralityEvaluator {
    max_iter: usize,
}

impl CentralityEvaluator {
    pub fn new(max_iter: usize) -> Self {
        Self { max_iter }
    }

    /// Degree, betweenness and closeness are always computed. Eigenvector
    /// failure is logged and recorded, leaving its scores empty.
    pub fn evaluate(&self, graph: &CommunicationGraph) -> CentralityScores {
        let (eigenvector, eigenvector_failure) = match eigenvector_centrality(graph, self.max_iter) {
            Ok(scores) => (scores, None),
            Err(failure) => {
                warn!("{}; eigenvector scores default to 0", failure);
                (HashMap::new(), Some(failure))
            }
        };

        CentralityScores {
            degree: degree_centrality(graph),
            betweenness: betweenness_centrality(graph),
            closeness: closeness_centrality(graph),
            eigenvector,
            eigenvector_failure,
        }
    }
}

/// Fraction of other nodes each node is linked to
pub fn degree_centrality(graph: &CommunicationGraph) -> HashMap<NodeId, f64> {
    let (nodes, adjacency) = graph.adjacency();
    let n = nodes.len();
    if n <= 1 {
        return nodes.into_iter().map(|v| (v.clone(), 1.0)).collect();
    }

    let scale = 1.0 / (n - 1) as f64;
    nodes
        .into_iter()
        .zip(adjacency.iter())
        .map(|(v, nbrs)| (v.clone(), nbrs.len() as f64 * scale))
        .collect()
}

/// Normalized shortest-path betweenness (Brandes)
pub fn betweenness_centrality(graph: &CommunicationGraph) -> HashMap<NodeId, f64> {
    let (nodes, adjacency) = graph.adjacency();
    let n = nodes.len();
    let mut scores = vec![0.0f64; n];

    for s in 0..n {
        let mut stack: Vec<usize> = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0f64; n];
        let mut dist: Vec<Option<usize>> = vec![None; n];
        sigma[s] = 1.0;
        dist[s] = Some(0);

        let mut queue = VecDeque::from([s]);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            let dv = dist[v].unwrap_or(0);
            for &w in &adjacency[v] {
                if dist[w].is_none() {
                    dist[w] = Some(dv + 1);
                    queue.push_back(w);
                }
                if dist[w] == Some(dv + 1) {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        // Back-propagate dependencies in order of non-increasing distance
        let mut delta = vec![0.0f64; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != s {
                scores[w] += delta[w];
            }
        }
    }

    // Each unordered pair was counted from both endpoints
    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for score in &mut scores {
            *score *= scale;
        }
    }

    nodes.into_iter().cloned().zip(scores).collect()
}

/// Closeness with the Wasserman-Faust correction for disconnected graphs
pub fn closeness_centrality(graph: &CommunicationGraph) -> HashMap<NodeId, f64> {
    let (nodes, adjacency) = graph.adjacency();
    let n = nodes.len();

    nodes
        .iter()
        .enumerate()
        .map(|(u, v)| {
            let dist = bfs_distances(&adjacency, u);
            let reachable: Vec<usize> = dist.iter().flatten().copied().collect();
            let total: usize = reachable.iter().sum();
            let r = reachable.len();

            let score = if total > 0 && n > 1 {
                let c = (r - 1) as f64 / total as f64;
                c * (r - 1) as f64 / (n - 1) as f64
            } else {
                0.0
            };
            ((*v).clone(), score)
        })
        .collect()
}

/// Eigenvector centrality by power iteration on `A + I`.
///
/// # Arguments
/// * `graph` - The graph snapshot
/// * `max_iter` - Iteration bound
///
/// # Returns
/// * `Ok(scores)` - L2-normalized scores
/// * `Err(ConvergenceFailure)` - The graph is empty or the iteration did not
///   settle within `max_iter` steps
pub fn eigenvector_centrality(
    graph: &CommunicationGraph,
    max_iter: usize,
) -> Result<HashMap<NodeId, f64>, ConvergenceFailure> {
    let (nodes, adjacency) = graph.adjacency();
    let n = nodes.len();
    let failure = ConvergenceFailure { max_iter, node_count: n };
    if n == 0 {
        return Err(failure);
    }

    let mut x = vec![1.0 / n as f64; n];
    for _ in 0..max_iter {
        let last = x.clone();
        for (v, nbrs) in adjacency.iter().enumerate() {
            for &w in nbrs {
                x[w] += last[v];
            }
        }

        let norm = x.iter().map(|value| value * value).sum::<f64>().sqrt();
        let norm = if norm > 0.0 { norm } else { 1.0 };
        for value in &mut x {
            *value /= norm;
        }

        let change: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if change < n as f64 * EIGENVECTOR_TOLERANCE {
            return Ok(nodes.into_iter().cloned().zip(x).collect());
        }
    }

    Err(failure)
}

/// Hop distances from `source`; `None` for unreachable nodes
fn bfs_distances(adjacency: &[Vec<usize>], source: usize) -> Vec<Option<usize>> {
    let mut dist = vec![None; adjacency.len()];
    dist[source] = Some(0);
    let mut queue = VecDeque::from([source]);
    while let Some(v) = queue.pop_front() {
        let dv = dist[v].unwrap_or(0);
        for &w in &adjacency[v] {
            if dist[w].is_none() {
                dist[w] = Some(dv + 1);
                queue.push_back(w);
            }
        }
    }
    dist
}
