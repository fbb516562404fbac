use std::collections::{BTreeMap, BTreeSet};

/// Weight added for each review between two contributors.
pub const REVIEW_WEIGHT: f64 = 1.0;
/// Weight added for each PR comment between two contributors.
pub const COMMENT_WEIGHT: f64 = 0.5;

/// Undirected weighted graph over contributors. Edges are stored once, keyed
/// by the lexically ordered pair, so `weight(a, b) == weight(b, a)` always.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollaborationGraph {
    edges: BTreeMap<(String, String), f64>,
}

fn edge_key(a: &str, b: &str) -> (String, String) {
    if a <= b { (a.to_string(), b.to_string()) } else { (b.to_string(), a.to_string()) }
}

impl CollaborationGraph {
    /// Adds `weight` to the edge between `a` and `b`, creating it if needed.
    /// Interactions of a contributor with themself are ignored.
    pub fn add_interaction(&mut self, a: &str, b: &str, weight: f64) {
        if a == b { return; }
        *self.edges.entry(edge_key(a, b)).or_insert(0.0) += weight;
    }

    pub fn weight(&self, a: &str, b: &str) -> Option<f64> {
        self.edges.get(&edge_key(a, b)).copied()
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.edges.contains_key(&edge_key(a, b))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Contributors with at least one edge.
    pub fn nodes(&self) -> BTreeSet<&str> {
        self.edges.keys()
            .flat_map(|(a, b)| [a.as_str(), b.as_str()])
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes().len()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.edges.iter().map(|((a, b), &w)| (a.as_str(), b.as_str(), w))
    }

    /// Number of distinct neighbours of every node.
    pub fn degrees(&self) -> BTreeMap<&str, usize> {
        let mut degrees: BTreeMap<&str, usize> = BTreeMap::new();
        for (a, b) in self.edges.keys() {
            *degrees.entry(a.as_str()).or_insert(0) += 1;
            *degrees.entry(b.as_str()).or_insert(0) += 1;
        }
        degrees
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
