//! Path reconstructor: flat edge lists back to root-to-leaf walks
//!
//! Input may be the concatenation of several flattened results, so it can
//! repeat edges, contain disconnected fragments, or close a cycle.

use std::collections::{HashMap, HashSet};

use tracing::{instrument, trace};

use crate::domain::entities::{Edge, NodeRef};

/// Rebuild every distinct walk starting at a node tagged as path start.
///
/// A walk ends at a node tagged as path end or at a node without outgoing
/// edges. Each walk tracks the node ids it has passed through; re-entering one
/// abandons that branch without emitting. Untagged sources are never roots.
#[instrument(level = "trace", skip_all, fields(edges = edges.len()))]
pub fn reconstruct_paths(edges: &[Edge]) -> Vec<Vec<Edge>> {
    let mut adjacency: HashMap<&str, Vec<&Edge>> = HashMap::new();
    let mut seen_edges: HashSet<(&str, &str)> = HashSet::new();
    for edge in edges {
        if seen_edges.insert(edge.key()) {
            adjacency.entry(edge.source.id()).or_default().push(edge);
        }
    }

    let mut seen_roots: HashSet<&str> = HashSet::new();
    let mut roots: Vec<&NodeRef> = Vec::new();
    for edge in edges {
        if edge.source.is_path_start() && seen_roots.insert(edge.source.id()) {
            roots.push(&edge.source);
        }
    }

    let mut paths = Vec::new();
    for root in roots {
        let mut stack: Vec<(&NodeRef, Vec<&Edge>, HashSet<&str>)> =
            vec![(root, Vec::new(), HashSet::new())];

        while let Some((current, prefix, visited)) = stack.pop() {
            if visited.contains(current.id()) {
                trace!("reconstruct: cycle at {}", current.id());
                continue;
            }

            let outgoing = adjacency
                .get(current.id())
                .map(Vec::as_slice)
                .unwrap_or_default();
            if current.is_path_end() || outgoing.is_empty() {
                if !prefix.is_empty() {
                    paths.push(prefix.into_iter().cloned().collect());
                }
                continue;
            }

            let mut visited = visited;
            visited.insert(current.id());
            // reversed so branches are emitted in edge order
            for edge in outgoing.iter().rev() {
                let mut branch = prefix.clone();
                branch.push(*edge);
                stack.push((&edge.target, branch, visited.clone()));
            }
        }
    }

    trace!("reconstruct: {} paths", paths.len());
    paths
}

/// True when every edge ends where the next one starts.
pub fn is_connected(path: &[Edge]) -> bool {
    path.windows(2)
        .all(|pair| pair[0].target.id() == pair[1].source.id())
}
