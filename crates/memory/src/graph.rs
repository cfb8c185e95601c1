//! In-memory concept graph — an arena of nodes plus adjacency indices.
//!
//! Edges are undirected. `related_items` walks the graph breadth-first, so
//! every node lands in the layer of its shortest hop distance from the
//! topic and is never reported again in a deeper layer.

use std::collections::{HashMap, VecDeque};
use std::path::Path;

use chirp_core::error::MemoryError;
use chirp_core::memory::{MemoryGraph, MemoryNode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Serialized form of a graph: nodes plus concept-to-concept edges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<MemoryNode>,

    #[serde(default)]
    pub edges: Vec<(String, String)>,
}

/// Read-only concept graph held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraph {
    nodes: Vec<MemoryNode>,
    index: HashMap<String, usize>,
    adjacency: Vec<Vec<usize>>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a snapshot. Edges naming unknown concepts are skipped.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let mut graph = Self::new();
        for node in snapshot.nodes {
            graph.add_node(node);
        }
        for (a, b) in &snapshot.edges {
            if !graph.connect(a, b) {
                warn!(from = %a, to = %b, "Skipping edge with unknown concept");
            }
        }
        graph
    }

    /// Load a JSON snapshot from disk. A missing file yields an empty graph.
    pub fn load(path: &Path) -> Result<Self, MemoryError> {
        if !path.exists() {
            debug!("No graph file at {}, starting empty", path.display());
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| MemoryError::Storage(format!("{}: {e}", path.display())))?;
        let snapshot: GraphSnapshot = serde_json::from_str(&content)
            .map_err(|e| MemoryError::Storage(format!("{}: {e}", path.display())))?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Insert a node, or replace the items of an existing node with the same concept.
    pub fn add_node(&mut self, node: MemoryNode) -> usize {
        if let Some(&idx) = self.index.get(&node.concept) {
            self.nodes[idx].memory_items = node.memory_items;
            return idx;
        }
        let idx = self.nodes.len();
        self.index.insert(node.concept.clone(), idx);
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        idx
    }

    /// Add an undirected edge. Returns false when either concept is unknown.
    pub fn connect(&mut self, a: &str, b: &str) -> bool {
        let (Some(&ia), Some(&ib)) = (self.index.get(a), self.index.get(b)) else {
            return false;
        };
        if ia == ib {
            return true;
        }
        if !self.adjacency[ia].contains(&ib) {
            self.adjacency[ia].push(ib);
            self.adjacency[ib].push(ia);
        }
        true
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Hop distance of every node reachable from `start` within `max_depth`.
    fn layers(&self, start: usize, max_depth: usize) -> Vec<(usize, usize)> {
        let mut dist: Vec<Option<usize>> = vec![None; self.nodes.len()];
        dist[start] = Some(0);
        let mut queue = VecDeque::from([start]);
        let mut reached = Vec::new();

        while let Some(current) = queue.pop_front() {
            let Some(d) = dist[current] else { continue };
            if d == max_depth {
                continue;
            }
            for &next in &self.adjacency[current] {
                if dist[next].is_none() {
                    dist[next] = Some(d + 1);
                    reached.push((next, d + 1));
                    queue.push_back(next);
                }
            }
        }
        reached
    }
}

impl MemoryGraph for InMemoryGraph {
    fn related_items(&self, topic: &str, depth: usize) -> (Vec<String>, Vec<String>) {
        let Some(&start) = self.index.get(topic) else {
            return (Vec::new(), Vec::new());
        };

        let mut first_layer = Vec::new();
        let mut second_layer = Vec::new();
        for (idx, hop) in self.layers(start, depth.min(2)) {
            let items = &self.nodes[idx].memory_items;
            match hop {
                1 => first_layer.extend(items.iter().cloned()),
                2 => second_layer.extend(items.iter().cloned()),
                _ => {}
            }
        }
        (first_layer, second_layer)
    }

    fn all_nodes(&self) -> Vec<MemoryNode> {
        self.nodes.clone()
    }
}
