//! In-memory graph oracle
//!
//! Holds a whole page/redirect graph loaded from a JSON document and answers
//! oracle queries by breadth-first search. Equal-length shortest paths are
//! ordered by their node title sequence so pagination is stable across calls.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::domain::{
    DomainError, NodeData, NodeKind, PageProjection, PathProjection, RedirectProjection,
};
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::{GraphOracle, OracleError, OracleResult, PageSampler};

/// Default hop ceiling for path queries.
pub const DEFAULT_MAX_HOPS: u32 = 100;

/// Serialized graph: nodes plus directed links between node ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub links: Vec<GraphLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
}

/// Node and relation counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub pages: usize,
    pub redirects: usize,
    pub link_to: usize,
    pub redirect_to: usize,
}

/// Outcome of one breadth-first search that reached its target.
#[derive(Debug)]
struct Search {
    source: usize,
    target: usize,
    length: u32,
    dist: Vec<Option<u32>>,
    preds: Vec<Vec<usize>>,
}

/// Page/redirect graph answering oracle queries in memory.
#[derive(Debug, Clone)]
pub struct InMemoryGraph {
    nodes: Vec<NodeData>,
    by_title: HashMap<String, usize>,
    outgoing: Vec<Vec<usize>>,
    max_hops: u32,
}

impl InMemoryGraph {
    /// Build a graph from a document, checking its consistency.
    ///
    /// Duplicate links collapse; link order per source node is kept.
    pub fn from_document(document: GraphDocument, max_hops: u32) -> Result<Self, DomainError> {
        let mut nodes = Vec::with_capacity(document.nodes.len());
        let mut by_id: HashMap<String, usize> = HashMap::new();
        let mut by_title: HashMap<String, usize> = HashMap::new();

        for node in document.nodes {
            if by_id.contains_key(&node.id) {
                return Err(DomainError::DuplicateNode(node.id));
            }
            if by_title.contains_key(&node.title) {
                return Err(DomainError::DuplicateTitle(node.title));
            }
            let idx = nodes.len();
            by_id.insert(node.id.clone(), idx);
            by_title.insert(node.title.clone(), idx);
            nodes.push(NodeData {
                id: node.id,
                title: node.title,
                kind: node.kind,
            });
        }

        let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        for link in document.links {
            let source = *by_id
                .get(&link.source)
                .ok_or_else(|| DomainError::UnknownNode(link.source.clone()))?;
            let target = *by_id
                .get(&link.target)
                .ok_or_else(|| DomainError::UnknownNode(link.target.clone()))?;
            if source == target {
                return Err(DomainError::InvalidRelation {
                    source_id: link.source,
                    target_id: link.target,
                    reason: "node links to itself".into(),
                });
            }
            if !seen.insert((source, target)) {
                continue;
            }
            if nodes[source].kind == NodeKind::Redirect && !outgoing[source].is_empty() {
                return Err(DomainError::InvalidRelation {
                    source_id: link.source,
                    target_id: link.target,
                    reason: "redirect already points elsewhere".into(),
                });
            }
            outgoing[source].push(target);
        }

        debug!(
            "from_document: {} nodes, {} links",
            nodes.len(),
            seen.len()
        );
        Ok(Self {
            nodes,
            by_title,
            outgoing,
            max_hops,
        })
    }

    /// Load a graph document from a JSON file.
    pub fn load(path: &Path, max_hops: u32) -> InfraResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| InfraError::io(format!("read graph {}", path.display()), e))?;
        let document: GraphDocument =
            serde_json::from_str(&content).map_err(|e| InfraError::GraphFormat {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Self::from_document(document, max_hops)
            .map_err(|e| InfraError::Application(ApplicationError::Domain(e)))
    }

    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats::default();
        for (idx, node) in self.nodes.iter().enumerate() {
            match node.kind {
                NodeKind::Page => {
                    stats.pages += 1;
                    stats.link_to += self.outgoing[idx].len();
                }
                NodeKind::Redirect => {
                    stats.redirects += 1;
                    stats.redirect_to += self.outgoing[idx].len();
                }
            }
        }
        stats
    }

    fn lookup(&self, title: &str) -> Option<usize> {
        self.by_title.get(title).copied()
    }

    /// Breadth-first search from a `kind` source, recording every shortest
    /// predecessor. `None` when either title is unknown, the source has the
    /// wrong kind, source and target coincide, or the target is out of reach.
    #[instrument(level = "trace", skip(self))]
    fn search(&self, kind: NodeKind, source_title: &str, target_title: &str) -> Option<Search> {
        let (source, target) = (self.lookup(source_title)?, self.lookup(target_title)?);
        if source == target || self.nodes[source].kind != kind {
            return None;
        }

        let mut dist: Vec<Option<u32>> = vec![None; self.nodes.len()];
        let mut preds: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        let mut queue = VecDeque::from([source]);
        dist[source] = Some(0);

        while let Some(current) = queue.pop_front() {
            let Some(depth) = dist[current] else {
                continue;
            };
            if depth >= self.max_hops || dist[target].is_some_and(|found| depth >= found) {
                break;
            }
            for &next in &self.outgoing[current] {
                match dist[next] {
                    None => {
                        dist[next] = Some(depth + 1);
                        preds[next].push(current);
                        queue.push_back(next);
                    }
                    Some(d) if d == depth + 1 => preds[next].push(current),
                    Some(_) => {}
                }
            }
        }

        let length = dist[target]?;
        Some(Search {
            source,
            target,
            length,
            dist,
            preds,
        })
    }

    /// The shortest path with the smallest title sequence.
    ///
    /// Titles are unique and all candidates share the source, so picking the
    /// smallest title at each step forward yields the first path in title
    /// order without listing the others.
    fn first_path(&self, search: &Search) -> Vec<usize> {
        // nodes lying on some shortest path
        let mut on_path = vec![false; self.nodes.len()];
        let mut stack = vec![search.target];
        while let Some(current) = stack.pop() {
            if on_path[current] {
                continue;
            }
            on_path[current] = true;
            stack.extend(search.preds[current].iter().copied());
        }

        let mut path = vec![search.source];
        let mut current = search.source;
        while current != search.target {
            let depth = search.dist[current].map(|d| d + 1);
            let next = self.outgoing[current]
                .iter()
                .copied()
                .filter(|&next| on_path[next] && search.dist[next] == depth)
                .min_by(|&a, &b| self.nodes[a].title.cmp(&self.nodes[b].title));
            let Some(next) = next else {
                break;
            };
            path.push(next);
            current = next;
        }
        path
    }

    /// All shortest paths from a `kind` source to the target, as node index
    /// sequences sorted by their titles.
    fn shortest_paths(&self, kind: NodeKind, source_title: &str, target_title: &str) -> Vec<Vec<usize>> {
        let Some(search) = self.search(kind, source_title, target_title) else {
            return Vec::new();
        };

        // walk predecessors back from the target
        let mut paths = Vec::new();
        let mut stack = vec![(search.target, vec![search.target])];
        while let Some((current, suffix)) = stack.pop() {
            if current == search.source {
                paths.push(suffix.into_iter().rev().collect::<Vec<usize>>());
                continue;
            }
            for &pred in &search.preds[current] {
                let mut next = suffix.clone();
                next.push(pred);
                stack.push((pred, next));
            }
        }

        paths.sort_by(|a, b| {
            let titles_a = a.iter().map(|&idx| self.nodes[idx].title.as_str());
            let titles_b = b.iter().map(|&idx| self.nodes[idx].title.as_str());
            titles_a.cmp(titles_b)
        });
        paths
    }

    /// Chain-shaped projection for one path.
    fn chain(&self, path: &[usize]) -> Option<PathProjection> {
        let mut child: Option<PathProjection> = None;
        for &idx in path.iter().rev() {
            let node = &self.nodes[idx];
            let projection = match node.kind {
                NodeKind::Page => {
                    let mut page = PageProjection::leaf(node.id.clone(), node.title.clone());
                    match child {
                        Some(PathProjection::Page(c)) => page.pages = Some(vec![c]),
                        Some(PathProjection::Redirect(c)) => page.redirects = Some(vec![c]),
                        None => {}
                    }
                    PathProjection::Page(page)
                }
                NodeKind::Redirect => {
                    let mut redirect = RedirectProjection::leaf(node.id.clone(), node.title.clone());
                    match child {
                        Some(PathProjection::Page(c)) => redirect.page = Some(Box::new(c)),
                        Some(PathProjection::Redirect(c)) => redirect.redirect = Some(Box::new(c)),
                        None => {}
                    }
                    PathProjection::Redirect(redirect)
                }
            };
            child = Some(projection);
        }
        child
    }

    fn sample_pages(&self, n: usize) -> Vec<String> {
        let pages: Vec<&NodeData> = self
            .nodes
            .iter()
            .filter(|node| node.kind == NodeKind::Page)
            .collect();
        pages
            .choose_multiple(&mut rand::thread_rng(), n)
            .map(|node| node.title.clone())
            .collect()
    }
}

fn clamp(value: i64) -> usize {
    usize::try_from(value.max(0)).unwrap_or(usize::MAX)
}

#[async_trait]
impl GraphOracle for InMemoryGraph {
    async fn exists_by_title(&self, title: &str, kind: NodeKind) -> OracleResult<bool> {
        Ok(self
            .lookup(title)
            .is_some_and(|idx| self.nodes[idx].kind == kind))
    }

    async fn shortest_path_tree(
        &self,
        kind: NodeKind,
        source_title: &str,
        target_title: &str,
    ) -> OracleResult<Option<PathProjection>> {
        Ok(self
            .search(kind, source_title, target_title)
            .and_then(|search| self.chain(&self.first_path(&search))))
    }

    async fn shortest_path_length(
        &self,
        kind: NodeKind,
        source_title: &str,
        target_title: &str,
    ) -> OracleResult<Option<u32>> {
        Ok(self
            .search(kind, source_title, target_title)
            .map(|search| search.length))
    }

    async fn shortest_path_trees(
        &self,
        kind: NodeKind,
        source_title: &str,
        target_title: &str,
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> OracleResult<Option<Vec<PathProjection>>> {
        let paths = self.shortest_paths(kind, source_title, target_title);
        let skip = skip.map(clamp).unwrap_or(0);
        let limit = limit.map(clamp).unwrap_or(usize::MAX);

        let trees: Vec<PathProjection> = paths
            .iter()
            .skip(skip)
            .take(limit)
            .filter_map(|path| self.chain(path))
            .collect();
        if trees.is_empty() {
            return Err(OracleError::NoElement);
        }
        Ok(Some(trees))
    }
}

#[async_trait]
impl PageSampler for InMemoryGraph {
    async fn random_page_titles(&self, n: usize) -> OracleResult<Vec<String>> {
        Ok(self.sample_pages(n))
    }
}
