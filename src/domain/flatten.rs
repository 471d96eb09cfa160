//! Path flattener: tree-shaped path results to unique tagged edges

use itertools::Itertools;
use tracing::{instrument, trace};

use crate::domain::arena::TreeArena;
use crate::domain::entities::{titles_match, Edge};

/// Flatten one path tree into its edges.
///
/// Edges come out in pre-order, one per `(parent, child)` slot, then collapse
/// on `(source.id, target.id)` keeping the first occurrence. The root is
/// tagged as path start when its title matches `source_title`; any child whose
/// title matches `target_title` is tagged as path end.
#[instrument(level = "trace", skip(tree))]
pub fn flatten(tree: &TreeArena, source_title: &str, target_title: &str) -> Vec<Edge> {
    let Some(root_idx) = tree.root() else {
        return Vec::new();
    };

    let mut emitted = Vec::with_capacity(tree.len().saturating_sub(1));
    for (_, node) in tree.iter() {
        let Some(parent_idx) = node.parent else {
            continue;
        };
        let Some(parent) = tree.get_node(parent_idx) else {
            continue;
        };

        let is_root = parent_idx == root_idx;
        let source = parent.data.to_node_ref().tagged(
            is_root && titles_match(&parent.data.title, source_title),
            false,
        );
        let target = node
            .data
            .to_node_ref()
            .tagged(false, titles_match(&node.data.title, target_title));
        emitted.push(Edge::new(source, target));
    }

    let edges: Vec<Edge> = emitted.into_iter().unique().collect();
    trace!("flatten: {} edges", edges.len());
    edges
}
