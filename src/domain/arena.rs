//! Tree adapter: request-scoped arena of path tree nodes
//!
//! Oracle projections are converted into a `TreeArena` once per request,
//! flattened, and dropped. The same node id may sit at several positions
//! when equal-length paths reconverge; each position is its own arena slot.

use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{NodeKind, NodeRef};
use crate::domain::projection::{PathProjection, ProjectionRef};

/// Data payload for tree nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub id: String,
    pub title: String,
    pub kind: NodeKind,
}

impl NodeData {
    pub fn to_node_ref(&self) -> NodeRef {
        NodeRef::new(self.id.clone(), &self.title, self.kind)
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.id)
    }
}

/// Tree node in the arena.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in oracle order
    pub children: Vec<Index>,
}

/// Arena-based tree holding one oracle path result.
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Build a tree from an oracle projection.
    ///
    /// Walks the projection with an explicit stack; children keep the order
    /// the oracle returned them in.
    #[instrument(level = "trace", skip_all)]
    pub fn from_projection(projection: &PathProjection) -> Self {
        let mut tree = TreeArena::new();
        let mut stack: Vec<(ProjectionRef<'_>, Option<Index>)> = vec![(projection.root(), None)];

        while let Some((current, parent_idx)) = stack.pop() {
            let data = NodeData {
                id: current.id().to_string(),
                title: current.title().to_string(),
                kind: current.kind(),
            };
            let current_idx = tree.insert_node(data, parent_idx);

            // reversed so the first child is inserted first
            for child in current.children().into_iter().rev() {
                stack.push((child, Some(current_idx)));
            }
        }

        tree
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order iterator, children left to right.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Number of nodes on the longest root-to-leaf walk.
    pub fn depth(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut max_depth = 0;
        let mut stack = vec![(root, 1)];
        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.get_node(idx) {
                for &child in &node.children {
                    stack.push((child, depth + 1));
                }
            }
        }
        max_depth
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::projection::{PageProjection, RedirectProjection};

    fn diamond() -> PathProjection {
        // a -> b -> d, a -> c(redirect) -> d
        PathProjection::Page(PageProjection {
            pages: Some(vec![PageProjection {
                pages: Some(vec![PageProjection::leaf("d", "D")]),
                ..PageProjection::leaf("b", "B")
            }]),
            redirects: Some(vec![RedirectProjection {
                page: Some(Box::new(PageProjection::leaf("d", "D"))),
                ..RedirectProjection::leaf("c", "C")
            }]),
            ..PageProjection::leaf("a", "A")
        })
    }

    #[test]
    fn given_reconverging_projection_when_adapting_then_shared_node_gets_two_slots() {
        let tree = TreeArena::from_projection(&diamond());
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.depth(), 3);
        let leaves: Vec<&str> = tree
            .iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.data.title.as_str())
            .collect();
        assert_eq!(leaves, vec!["D", "D"]);
    }

    #[test]
    fn given_projection_when_iterating_then_order_is_preorder_in_oracle_order() {
        let tree = TreeArena::from_projection(&diamond());
        let ids: Vec<&str> = tree.iter().map(|(_, n)| n.data.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "d", "c", "d"]);
    }

    #[test]
    fn given_empty_arena_when_measuring_then_depth_is_zero() {
        let tree = TreeArena::new();
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.iter().count(), 0);
    }

    #[test]
    fn given_redirect_root_when_adapting_then_kind_is_kept() {
        let projection = PathProjection::Redirect(RedirectProjection {
            page: Some(Box::new(PageProjection::leaf("3", "gandalf"))),
            ..RedirectProjection::leaf("4", "mithrandir")
        });
        let tree = TreeArena::from_projection(&projection);
        let root = tree.root().and_then(|idx| tree.get_node(idx)).unwrap();
        assert_eq!(root.data.kind, NodeKind::Redirect);
        assert_eq!(root.children.len(), 1);
    }
}
