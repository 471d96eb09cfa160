//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::PathService;
use crate::application::ApplicationError;
use crate::config::Settings;
use crate::infrastructure::error::InfraResult;
use crate::infrastructure::memory::InMemoryGraph;
use crate::infrastructure::traits::{GraphOracle, PageSampler};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Path queries
    pub paths: PathService,
}

impl ServiceContainer {
    /// Create a container backed by the in-memory graph named in `settings`.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let graph = Self::load_graph(&settings)?;
        Ok(Self::with_graph(settings, graph))
    }

    /// Load the graph document configured in `settings`.
    pub fn load_graph(settings: &Settings) -> InfraResult<Arc<InMemoryGraph>> {
        let path = settings
            .graph_file
            .as_deref()
            .ok_or_else(|| ApplicationError::Config {
                message: "no graph file configured (use --graph or WIKIPATH_GRAPH_FILE)".into(),
            })?;
        debug!("load_graph: {} (max_hops={})", path.display(), settings.max_hops);
        Ok(Arc::new(InMemoryGraph::load(path, settings.max_hops)?))
    }

    /// Create a container around an already loaded graph.
    pub fn with_graph(settings: Settings, graph: Arc<InMemoryGraph>) -> Self {
        Self::with_deps(settings, graph.clone(), graph)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        oracle: Arc<dyn GraphOracle>,
        sampler: Arc<dyn PageSampler>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            paths: PathService::new(oracle, sampler),
        }
    }
}
