//! Source-type resolution
//!
//! Decides whether a title names a page or a redirect so the path service
//! can issue the matching oracle query.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::ApplicationResult;
use crate::domain::NodeKind;
use crate::infrastructure::traits::GraphOracle;

/// Resolves the kind of the node a title names.
#[derive(Clone)]
pub struct SourceTypeResolver {
    oracle: Arc<dyn GraphOracle>,
}

impl SourceTypeResolver {
    pub fn new(oracle: Arc<dyn GraphOracle>) -> Self {
        Self { oracle }
    }

    /// Kind of the node titled `title`, or `None` when no node has it.
    ///
    /// Both existence checks run concurrently. A page wins if the store ever
    /// reports both.
    #[instrument(level = "debug", skip(self))]
    pub async fn resolve(&self, title: &str) -> ApplicationResult<Option<NodeKind>> {
        let (is_page, is_redirect) = tokio::try_join!(
            self.oracle.exists_by_title(title, NodeKind::Page),
            self.oracle.exists_by_title(title, NodeKind::Redirect)
        )?;

        let kind = match (is_page, is_redirect) {
            (true, _) => Some(NodeKind::Page),
            (false, true) => Some(NodeKind::Redirect),
            (false, false) => {
                warn!("resolve: node '{}' not found", title);
                None
            }
        };
        debug!("resolve: '{}' -> {:?}", title, kind);
        Ok(kind)
    }
}
