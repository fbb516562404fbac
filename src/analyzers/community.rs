//! Greedy modularity maximization (Clauset–Newman–Moore) over the weighted
//! collaboration graph.
//!
//! Every contributor starts in its own community; the pair of connected
//! communities whose merge raises modularity the most is merged until no
//! merge raises it. Ties go to the pair with the lowest indices, where
//! indices follow contributor name order, so the result is deterministic.

use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use crate::analyzers::graph::CollaborationGraph;

/// Below this many nodes a partition carries no information.
pub const MIN_NODES: usize = 3;

// Gains smaller than this are rounding noise, not structure
const MIN_GAIN: f64 = 1e-12;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CommunityError {
    #[error("graph has {0} node(s); community detection needs at least {MIN_NODES}")]
    TooSmall(usize),
    #[error("graph carries no positive edge weight")]
    NoWeight,
}

/// Partitions the graph into communities. Members of each community are
/// sorted; communities are ordered by size, largest first.
pub fn greedy_modularity_communities(
    graph: &CollaborationGraph,
) -> Result<Vec<Vec<String>>, CommunityError> {
    let nodes: Vec<&str> = graph.nodes().into_iter().collect();
    if nodes.len() < MIN_NODES {
        return Err(CommunityError::TooSmall(nodes.len()));
    }
    let index: BTreeMap<&str, usize> = nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();

    let total_weight: f64 = graph.edges().map(|(_, _, w)| w).sum();
    if !(total_weight > 0.0) {
        return Err(CommunityError::NoWeight);
    }
    let two_m = 2.0 * total_weight;

    // e[(i, j)] with i < j: fraction of edge ends joining communities i and j
    // a[i]: fraction of edge ends attached to community i
    let mut e: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    let mut a = vec![0.0_f64; nodes.len()];
    for (u, v, w) in graph.edges() {
        let (i, j) = (index[u], index[v]);
        *e.entry((i.min(j), i.max(j))).or_insert(0.0) += w / two_m;
        a[i] += w / two_m;
        a[j] += w / two_m;
    }

    let mut members: Vec<Option<BTreeSet<usize>>> =
        (0..nodes.len()).map(|i| Some(BTreeSet::from([i]))).collect();

    loop {
        let best = e.iter().fold(None, |best: Option<((usize, usize), f64)>, (&key, &eij)| {
            let gain = 2.0 * (eij - a[key.0] * a[key.1]);
            match best {
                Some((_, g)) if g >= gain => best,
                _ => Some((key, gain)),
            }
        });
        let Some(((i, j), gain)) = best else { break };
        if gain <= MIN_GAIN { break; }

        // fold community j into community i
        let absorbed = members[j].take().unwrap_or_default();
        if let Some(set) = members[i].as_mut() {
            set.extend(absorbed);
        }
        a[i] += a[j];
        a[j] = 0.0;

        let touching_j: Vec<((usize, usize), f64)> = e.iter()
            .filter(|(&(x, y), _)| x == j || y == j)
            .map(|(&k, &v)| (k, v))
            .collect();
        for ((x, y), v) in touching_j {
            e.remove(&(x, y));
            let other = if x == j { y } else { x };
            if other != i {
                *e.entry((i.min(other), i.max(other))).or_insert(0.0) += v;
            }
        }
    }

    let mut communities: Vec<Vec<String>> = members.into_iter()
        .flatten()
        .map(|set| set.into_iter().map(|i| nodes[i].to_string()).collect())
        .collect();
    communities.sort_by(|x, y| y.len().cmp(&x.len()).then_with(|| x.cmp(y)));
    Ok(communities)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clique(g: &mut CollaborationGraph, names: &[&str], w: f64) {
        for i in 0..names.len() {
            for j in (i + 1)..names.len() {
                g.add_interaction(names[i], names[j], w);
            }
        }
    }

    #[test]
    fn test_two_cliques_joined_by_a_bridge() {
        let mut g = CollaborationGraph::default();
        clique(&mut g, &["a", "b", "c"], 1.0);
        clique(&mut g, &["x", "y", "z"], 1.0);
        g.add_interaction("c", "x", 0.5);

        let communities = greedy_modularity_communities(&g).expect("graph is large enough");
        assert_eq!(communities.len(), 2, "Expected the two cliques as communities: {communities:?}");
        assert_eq!(communities[0], vec!["a", "b", "c"]);
        assert_eq!(communities[1], vec!["x", "y", "z"]);
    }

    #[test]
    fn test_every_node_assigned_once() {
        let mut g = CollaborationGraph::default();
        clique(&mut g, &["a", "b", "c", "d"], 1.0);
        g.add_interaction("d", "e", 1.0);
        g.add_interaction("e", "f", 2.0);
        let communities = greedy_modularity_communities(&g).unwrap();
        let mut all: Vec<String> = communities.into_iter().flatten().collect();
        all.sort();
        assert_eq!(all, vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_too_small_graph_is_an_error() {
        let mut g = CollaborationGraph::default();
        g.add_interaction("a", "b", 1.0);
        assert_eq!(greedy_modularity_communities(&g), Err(CommunityError::TooSmall(2)));
    }

    #[test]
    fn test_zero_weight_graph_is_an_error() {
        let mut g = CollaborationGraph::default();
        g.add_interaction("a", "b", 0.0);
        g.add_interaction("b", "c", 0.0);
        assert_eq!(greedy_modularity_communities(&g), Err(CommunityError::NoWeight));
    }

    #[test]
    fn test_deterministic() {
        let mut g = CollaborationGraph::default();
        clique(&mut g, &["p", "q", "r", "s"], 1.0);
        g.add_interaction("s", "t", 1.0);
        let first = greedy_modularity_communities(&g).unwrap();
        let second = greedy_modularity_communities(&g).unwrap();
        assert_eq!(first, second);
    }
}
