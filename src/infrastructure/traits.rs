//! Graph oracle boundary traits
//!
//! The graph store is an external collaborator. These traits describe the
//! primitives the path services consume, so services can run against the
//! in-memory graph, a real store client, or a test double.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{NodeKind, PathProjection};

/// Failure reported by an oracle call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The oracle collected nothing where it expected at least one element.
    #[error("oracle returned no element")]
    NoElement,

    /// The call itself failed (connection, timeout, malformed reply).
    #[error("oracle transport failure: {message}")]
    Transport { message: String },
}

impl OracleError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

pub type OracleResult<T> = Result<T, OracleError>;

/// Path primitives of the graph store.
///
/// Every path query takes the kind of its source node: the store answers a
/// page-rooted and a redirect-rooted query differently, and callers resolve
/// the kind first. Targets may be of either kind. Titles are matched the way
/// the store matches them.
#[async_trait]
pub trait GraphOracle: Send + Sync {
    /// Whether a node of `kind` carries `title`.
    async fn exists_by_title(&self, title: &str, kind: NodeKind) -> OracleResult<bool>;

    /// One shortest path as a tree, or `None` when there is no path.
    async fn shortest_path_tree(
        &self,
        kind: NodeKind,
        source_title: &str,
        target_title: &str,
    ) -> OracleResult<Option<PathProjection>>;

    /// Hop count of a shortest path, or `None` when there is no path.
    async fn shortest_path_length(
        &self,
        kind: NodeKind,
        source_title: &str,
        target_title: &str,
    ) -> OracleResult<Option<u32>>;

    /// Shortest paths as one tree per path, paginated over whole paths.
    ///
    /// `skip`/`limit` of `None` mean unbounded. Negative values are clamped
    /// to zero by the implementation.
    async fn shortest_path_trees(
        &self,
        kind: NodeKind,
        source_title: &str,
        target_title: &str,
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> OracleResult<Option<Vec<PathProjection>>>;
}

/// Random page sampling.
#[async_trait]
pub trait PageSampler: Send + Sync {
    /// Up to `n` distinct page titles in random order.
    async fn random_page_titles(&self, n: usize) -> OracleResult<Vec<String>>;
}
