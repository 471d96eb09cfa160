//! Path service
//!
//! Public entry point for shortest-path queries. Resolves the source kind,
//! dispatches to the matching oracle query, flattens the returned trees into
//! tagged edges, and folds "not found" and "no path" into empty results.

use std::sync::Arc;

use tracing::{debug, instrument, trace, warn};

use crate::application::services::SourceTypeResolver;
use crate::application::ApplicationResult;
use crate::domain::{flatten, Edge, NodeKind, PathProjection, PathRequest, TreeArena};
use crate::infrastructure::traits::{GraphOracle, OracleError, PageSampler};

/// Service for shortest-path queries between titled nodes.
pub struct PathService {
    oracle: Arc<dyn GraphOracle>,
    sampler: Arc<dyn PageSampler>,
    resolver: SourceTypeResolver,
}

impl PathService {
    pub fn new(oracle: Arc<dyn GraphOracle>, sampler: Arc<dyn PageSampler>) -> Self {
        let resolver = SourceTypeResolver::new(oracle.clone());
        Self {
            oracle,
            sampler,
            resolver,
        }
    }

    pub fn resolver(&self) -> &SourceTypeResolver {
        &self.resolver
    }

    /// Hop count of a shortest path.
    ///
    /// Identical titles answer `0` without touching the oracle. An unknown
    /// source and an unreachable target both answer `0` as well.
    #[instrument(level = "debug", skip(self))]
    pub async fn length(&self, source_title: &str, target_title: &str) -> ApplicationResult<u32> {
        let request = PathRequest::new(source_title, target_title);
        if request.is_identity() {
            return Ok(0);
        }
        let Some(kind) = self.resolver.resolve(source_title).await? else {
            return Ok(0);
        };

        let length = self
            .oracle
            .shortest_path_length(kind, source_title, target_title)
            .await?;
        debug!("length: kind={} length={:?}", kind, length);
        Ok(length.unwrap_or(0))
    }

    /// Edges of one shortest path.
    #[instrument(level = "debug", skip(self))]
    pub async fn single_path(
        &self,
        source_title: &str,
        target_title: &str,
    ) -> ApplicationResult<Vec<Edge>> {
        let request = PathRequest::new(source_title, target_title);
        if request.is_identity() {
            return Ok(Vec::new());
        }
        let Some(kind) = self.resolver.resolve(source_title).await? else {
            return Ok(Vec::new());
        };

        let tree = self
            .oracle
            .shortest_path_tree(kind, source_title, target_title)
            .await?;
        let edges = match tree {
            Some(projection) => flatten_projection(&projection, &request),
            None => Vec::new(),
        };
        debug!("single_path: kind={} edges={}", kind, edges.len());
        Ok(edges)
    }

    /// Shortest path between two distinct random pages.
    #[instrument(level = "debug", skip(self))]
    pub async fn random_path(&self) -> ApplicationResult<Vec<Edge>> {
        let titles = self.sampler.random_page_titles(2).await?;
        let [source_title, target_title] = titles.as_slice() else {
            warn!("random_path: sampler returned {} titles", titles.len());
            return Ok(Vec::new());
        };
        debug!("random_path: '{}' -> '{}'", source_title, target_title);
        self.single_path(source_title, target_title).await
    }

    /// Edges of a page of shortest paths.
    ///
    /// `skip` and `limit` count whole paths and go to the oracle unchanged;
    /// the oracle clamps negative values.
    #[instrument(level = "debug", skip(self))]
    pub async fn paged_paths(
        &self,
        source_title: &str,
        target_title: &str,
        skip: i64,
        limit: i64,
    ) -> ApplicationResult<Vec<Edge>> {
        let request = PathRequest::new(source_title, target_title).paged(skip, limit);
        self.multi_path(&request).await
    }

    /// Edges of every shortest path.
    #[instrument(level = "debug", skip(self))]
    pub async fn all_paths(
        &self,
        source_title: &str,
        target_title: &str,
    ) -> ApplicationResult<Vec<Edge>> {
        let request = PathRequest::new(source_title, target_title);
        self.multi_path(&request).await
    }

    /// Each tree is flattened on its own and the edge lists concatenated, so
    /// every returned path carries its own start and end tags.
    async fn multi_path(&self, request: &PathRequest) -> ApplicationResult<Vec<Edge>> {
        if request.is_identity() {
            return Ok(Vec::new());
        }
        let Some(kind) = self.resolver.resolve(&request.source_title).await? else {
            return Ok(Vec::new());
        };

        let trees = match self.fetch_trees(kind, request).await {
            Ok(trees) => trees.unwrap_or_default(),
            Err(OracleError::NoElement) => {
                debug!(
                    "multi_path: no paths found between '{}' and '{}'",
                    request.source_title, request.target_title
                );
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        let edges: Vec<Edge> = trees
            .iter()
            .flat_map(|projection| flatten_projection(projection, request))
            .collect();
        debug!(
            "multi_path: kind={} trees={} edges={}",
            kind,
            trees.len(),
            edges.len()
        );
        Ok(edges)
    }

    async fn fetch_trees(
        &self,
        kind: NodeKind,
        request: &PathRequest,
    ) -> Result<Option<Vec<PathProjection>>, OracleError> {
        self.oracle
            .shortest_path_trees(
                kind,
                &request.source_title,
                &request.target_title,
                request.skip,
                request.limit,
            )
            .await
    }
}

fn flatten_projection(projection: &PathProjection, request: &PathRequest) -> Vec<Edge> {
    let tree = TreeArena::from_projection(projection);
    trace!("flatten_projection: {} nodes, depth {}", tree.len(), tree.depth());
    flatten(&tree, &request.source_title, &request.target_title)
}
