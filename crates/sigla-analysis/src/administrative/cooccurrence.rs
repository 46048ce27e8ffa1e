//! Co-occurrence network over non-numeric tokens.
//!
//! Nodes are distinct token texts; an edge's weight counts how often the two
//! appear together in a line (or within `window` tokens of each other).

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use sigla_core::corpus::{Corpus, TokenClass};
use sigla_core::types::collections::FxHashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub item: String,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub window: usize,
    pub node_count: usize,
    pub edge_count: usize,
    /// Highest-degree nodes as `(item, degree)`.
    pub hubs: Vec<(String, usize)>,
}

#[derive(Debug, Clone)]
pub struct CooccurrenceNetwork {
    graph: UnGraph<String, u32>,
    index: FxHashMap<String, NodeIndex>,
    window: usize,
}

impl CooccurrenceNetwork {
    /// Build the network. `window == 0` links every pair on the same line.
    pub fn build(corpus: &Corpus, window: usize) -> Self {
        let mut network = Self {
            graph: UnGraph::new_undirected(),
            index: FxHashMap::default(),
            window,
        };

        for line in corpus.inscriptions().iter().flat_map(|i| i.lines.iter()) {
            let items: Vec<NodeIndex> = line
                .tokens
                .iter()
                .filter(|t| t.class != TokenClass::Number)
                .map(|t| network.node(&t.text))
                .collect();
            for (i, &a) in items.iter().enumerate() {
                for (offset, &b) in items[i + 1..].iter().enumerate() {
                    if window > 0 && offset + 1 > window {
                        break;
                    }
                    if a == b {
                        continue;
                    }
                    match network.graph.find_edge(a, b) {
                        Some(edge) => network.graph[edge] += 1,
                        None => {
                            network.graph.add_edge(a, b, 1);
                        }
                    }
                }
            }
        }

        debug!(
            nodes = network.graph.node_count(),
            edges = network.graph.edge_count(),
            window,
            "co-occurrence network built"
        );
        network
    }

    fn node(&mut self, item: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(item) {
            return idx;
        }
        let idx = self.graph.add_node(item.to_string());
        self.index.insert(item.to_string(), idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn contains(&self, item: &str) -> bool {
        self.index.contains_key(item)
    }

    /// Number of distinct neighbors. `None` for an unknown item.
    pub fn degree(&self, item: &str) -> Option<usize> {
        let idx = *self.index.get(item)?;
        Some(self.graph.edges(idx).count())
    }

    /// Sum of incident edge weights.
    pub fn weighted_degree(&self, item: &str) -> Option<u32> {
        let idx = *self.index.get(item)?;
        Some(self.graph.edges(idx).map(|e| *e.weight()).sum())
    }

    pub fn edge_weight(&self, a: &str, b: &str) -> Option<u32> {
        let a = *self.index.get(a)?;
        let b = *self.index.get(b)?;
        let edge = self.graph.find_edge(a, b)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Up to `k` neighbors by weight descending, ties by item.
    pub fn top_neighbors(&self, item: &str, k: usize) -> Vec<Neighbor> {
        let Some(&idx) = self.index.get(item) else {
            return Vec::new();
        };
        let mut neighbors: Vec<Neighbor> = self
            .graph
            .edges(idx)
            .map(|e| {
                let other = if e.source() == idx { e.target() } else { e.source() };
                Neighbor {
                    item: self.graph[other].clone(),
                    weight: *e.weight(),
                }
            })
            .collect();
        neighbors.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.item.cmp(&b.item)));
        neighbors.truncate(k);
        neighbors
    }

    /// Up to `k` items by degree descending, ties by item.
    pub fn hubs(&self, k: usize) -> Vec<(String, usize)> {
        let mut hubs: Vec<(String, usize)> = self
            .graph
            .node_indices()
            .map(|idx| (self.graph[idx].clone(), self.graph.edges(idx).count()))
            .collect();
        hubs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        hubs.truncate(k);
        hubs
    }

    pub fn summary(&self, hubs: usize) -> NetworkSummary {
        NetworkSummary {
            window: self.window,
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            hubs: self.hubs(hubs),
        }
    }
}
