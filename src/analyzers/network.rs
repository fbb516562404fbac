use tracing::{debug, warn};
use crate::analyzers::community::{greedy_modularity_communities, CommunityError};
use crate::analyzers::graph::CollaborationGraph;
use crate::analyzers::members::{round3, MemberTable};
use crate::types::{CentralMember, CollaborationNetwork, NetworkHealth};

const TOP_CENTRAL_MEMBERS: usize = 3;

/// Graph-level view of how the team interacts: density, most connected
/// members, members with no interactions and collaboration clusters.
pub fn analyze_network(graph: &CollaborationGraph, members: &MemberTable) -> CollaborationNetwork {
    let connected = graph.nodes();
    let n = connected.len();
    if n == 0 {
        return CollaborationNetwork::empty();
    }

    let isolated_members: Vec<String> = members.names()
        .filter(|m| !connected.contains(m))
        .map(|m| m.to_string())
        .collect();

    let raw_density = density(n, graph.edge_count());

    let mut central_members: Vec<CentralMember> = graph.degrees().into_iter()
        .map(|(member, degree)| CentralMember {
            member: member.to_string(),
            centrality: if n > 1 { round3(degree as f64 / (n - 1) as f64) } else { 0.0 },
        })
        .collect();
    central_members.sort_by(|a, b| b.centrality.total_cmp(&a.centrality));
    central_members.truncate(TOP_CENTRAL_MEMBERS);

    let clusters = match greedy_modularity_communities(graph) {
        Ok(communities) => communities.into_iter().filter(|c| c.len() >= 2).collect(),
        Err(e @ CommunityError::TooSmall(_)) => {
            debug!("Skipping collaboration clusters: {e}");
            Vec::new()
        }
        Err(e) => {
            warn!("Error detecting collaboration clusters: {e}");
            Vec::new()
        }
    };

    let network_health = network_health(raw_density, isolated_members.len());

    CollaborationNetwork {
        density: round3(raw_density),
        central_members,
        isolated_members,
        clusters,
        network_health,
    }
}

/// Edges present over edges possible in a simple undirected graph. Unrounded;
/// the verdict is taken on this value and only the reported figure is 3dp.
pub fn density(nodes: usize, edges: usize) -> f64 {
    if nodes < 2 { return 0.0; }
    let possible = nodes as f64 * (nodes - 1) as f64 / 2.0;
    edges as f64 / possible
}

pub fn network_health(density: f64, isolated: usize) -> NetworkHealth {
    if density >= 0.7 && isolated == 0 { NetworkHealth::Excellent }
    else if density >= 0.5 && isolated <= 1 { NetworkHealth::Good }
    else if density >= 0.3 && isolated <= 2 { NetworkHealth::Fair }
    else { NetworkHealth::Poor }
}
