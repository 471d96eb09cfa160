//! Domain entities: nodes, edges and path requests

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Kind of a graph node.
///
/// Pages and redirects are disjoint in the backing data: a title names
/// either a page or a redirect, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeKind {
    Page,
    Redirect,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Page => write!(f, "PAGE"),
            NodeKind::Redirect => write!(f, "REDIRECT"),
        }
    }
}

/// Strip the backslashes left behind by double escaping in the store.
///
/// Idempotent: the output contains no backslash.
pub fn sanitize_title(title: &str) -> String {
    title.replace('\\', "")
}

/// Case-insensitive title comparison used for short-circuits and tagging.
pub fn titles_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// A node as it appears in a discovered path.
///
/// Identity is the node id: two `NodeRef`s with the same id are equal
/// regardless of their tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "NodeRefWire")]
pub struct NodeRef {
    id: String,
    title: String,
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(rename = "isTopParent", skip_serializing_if = "is_false")]
    is_path_start: bool,
    #[serde(rename = "isBottomChild", skip_serializing_if = "is_false")]
    is_path_end: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Incoming shape; routed through `NodeRef::new` so titles are sanitized.
#[derive(Deserialize)]
struct NodeRefWire {
    id: String,
    title: String,
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(rename = "isTopParent", default)]
    is_path_start: bool,
    #[serde(rename = "isBottomChild", default)]
    is_path_end: bool,
}

impl From<NodeRefWire> for NodeRef {
    fn from(wire: NodeRefWire) -> Self {
        NodeRef::new(wire.id, &wire.title, wire.kind).tagged(wire.is_path_start, wire.is_path_end)
    }
}

impl NodeRef {
    pub fn new(id: impl Into<String>, title: &str, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            title: sanitize_title(title),
            kind,
            is_path_start: false,
            is_path_end: false,
        }
    }

    /// Same node with the given start/end tags.
    pub fn tagged(mut self, is_path_start: bool, is_path_end: bool) -> Self {
        self.is_path_start = is_path_start;
        self.is_path_end = is_path_end;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Serialized as `isTopParent`.
    pub fn is_path_start(&self) -> bool {
        self.is_path_start
    }

    /// Serialized as `isBottomChild`.
    pub fn is_path_end(&self) -> bool {
        self.is_path_end
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for NodeRef {}

impl Hash for NodeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.title, self.id, self.kind)
    }
}

/// One directed hop used by a discovered shortest path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeRef,
    pub target: NodeRef,
}

impl Edge {
    pub fn new(source: NodeRef, target: NodeRef) -> Self {
        Self { source, target }
    }

    /// `(source.id, target.id)`, the edge identity.
    pub fn key(&self) -> (&str, &str) {
        (self.source.id(), self.target.id())
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source.title(), self.target.title())
    }
}

/// A path query between two titles.
///
/// `skip` and `limit` count whole paths, never edges. `None` means unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRequest {
    pub source_title: String,
    pub target_title: String,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl PathRequest {
    pub fn new(source_title: impl Into<String>, target_title: impl Into<String>) -> Self {
        Self {
            source_title: source_title.into(),
            target_title: target_title.into(),
            skip: None,
            limit: None,
        }
    }

    pub fn paged(mut self, skip: i64, limit: i64) -> Self {
        self.skip = Some(skip);
        self.limit = Some(limit);
        self
    }

    /// Source and target name the same node (case-insensitive).
    pub fn is_identity(&self) -> bool {
        titles_match(&self.source_title, &self.target_title)
    }
}
