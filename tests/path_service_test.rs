//! Integration tests for PathService over the in-memory graph

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use wikipath::application::services::PathService;
use wikipath::domain::{is_connected, reconstruct_paths, Edge, NodeKind, PathProjection};
use wikipath::infrastructure::memory::{
    GraphDocument, GraphLink, GraphNode, InMemoryGraph, DEFAULT_MAX_HOPS,
};
use wikipath::infrastructure::traits::{GraphOracle, OracleResult, PageSampler};
use wikipath::util::testing;

/// Oracle decorator recording every call before delegating to the graph.
struct RecordingOracle {
    inner: Arc<InMemoryGraph>,
    calls: Mutex<Vec<String>>,
}

impl RecordingOracle {
    fn new(inner: Arc<InMemoryGraph>) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GraphOracle for RecordingOracle {
    async fn exists_by_title(&self, title: &str, kind: NodeKind) -> OracleResult<bool> {
        self.record(format!("exists:{kind}:{title}"));
        self.inner.exists_by_title(title, kind).await
    }

    async fn shortest_path_tree(
        &self,
        kind: NodeKind,
        source_title: &str,
        target_title: &str,
    ) -> OracleResult<Option<PathProjection>> {
        self.record(format!("tree:{kind}"));
        self.inner
            .shortest_path_tree(kind, source_title, target_title)
            .await
    }

    async fn shortest_path_length(
        &self,
        kind: NodeKind,
        source_title: &str,
        target_title: &str,
    ) -> OracleResult<Option<u32>> {
        self.record(format!("length:{kind}"));
        self.inner
            .shortest_path_length(kind, source_title, target_title)
            .await
    }

    async fn shortest_path_trees(
        &self,
        kind: NodeKind,
        source_title: &str,
        target_title: &str,
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> OracleResult<Option<Vec<PathProjection>>> {
        self.record(format!("trees:{kind}"));
        self.inner
            .shortest_path_trees(kind, source_title, target_title, skip, limit)
            .await
    }
}

fn node(id: &str, title: &str, kind: NodeKind) -> GraphNode {
    GraphNode {
        id: id.into(),
        title: title.into(),
        kind,
    }
}

fn link(source: &str, target: &str) -> GraphLink {
    GraphLink {
        source: source.into(),
        target: target.into(),
    }
}

/// Mithrandir redirects to Gandalf; three equal-length routes lead to Maiar.
fn middle_earth() -> Arc<InMemoryGraph> {
    let document = GraphDocument {
        nodes: vec![
            node("1", "Gandalf", NodeKind::Page),
            node("2", "Mithrandir", NodeKind::Redirect),
            node("3", "Istari", NodeKind::Page),
            node("4", "Olorin", NodeKind::Page),
            node("5", "Celebrimbor", NodeKind::Page),
            node("6", "Maiar", NodeKind::Page),
            node("7", "Valinor", NodeKind::Page),
        ],
        links: vec![
            link("2", "1"),
            link("1", "3"),
            link("1", "4"),
            link("1", "5"),
            link("3", "6"),
            link("4", "6"),
            link("5", "6"),
            link("6", "7"),
        ],
    };
    Arc::new(InMemoryGraph::from_document(document, DEFAULT_MAX_HOPS).unwrap())
}

fn recording_service() -> (PathService, Arc<RecordingOracle>) {
    testing::init_test_setup();
    let graph = middle_earth();
    let oracle = Arc::new(RecordingOracle::new(graph.clone()));
    let service = PathService::new(oracle.clone(), graph);
    (service, oracle)
}

fn titles(edges: &[Edge]) -> Vec<(String, String)> {
    edges
        .iter()
        .map(|e| (e.source.title().to_string(), e.target.title().to_string()))
        .collect()
}

fn start_count(edges: &[Edge]) -> usize {
    edges.iter().filter(|e| e.source.is_path_start()).count()
}

fn end_count(edges: &[Edge]) -> usize {
    edges.iter().filter(|e| e.target.is_path_end()).count()
}

#[tokio::test]
async fn given_identical_titles_when_querying_then_oracle_is_never_called() {
    let (service, oracle) = recording_service();

    assert_eq!(service.length("Gandalf", "gandalf").await.unwrap(), 0);
    assert!(service.single_path("Gandalf", "GANDALF").await.unwrap().is_empty());
    assert!(service
        .paged_paths("Gandalf", "Gandalf", 0, 5)
        .await
        .unwrap()
        .is_empty());
    assert!(service.all_paths("Maiar", "maiar").await.unwrap().is_empty());

    assert!(oracle.calls().is_empty());
}

#[tokio::test]
async fn given_reachable_target_when_length_then_counts_hops() {
    let (service, _) = recording_service();

    assert_eq!(service.length("Gandalf", "Maiar").await.unwrap(), 2);
    assert_eq!(service.length("Gandalf", "Valinor").await.unwrap(), 3);
    assert_eq!(service.length("Mithrandir", "Valinor").await.unwrap(), 4);
}

#[tokio::test]
async fn given_unknown_or_unreachable_when_querying_then_zero_and_empty() {
    let (service, _) = recording_service();

    assert_eq!(service.length("Saruman", "Maiar").await.unwrap(), 0);
    assert!(service.single_path("Saruman", "Maiar").await.unwrap().is_empty());
    assert_eq!(service.length("Valinor", "Gandalf").await.unwrap(), 0);
    assert!(service.single_path("Valinor", "Gandalf").await.unwrap().is_empty());
    assert!(service.all_paths("Valinor", "Gandalf").await.unwrap().is_empty());
}

#[tokio::test]
async fn given_unknown_source_when_querying_then_no_path_query_is_issued() {
    let (service, oracle) = recording_service();

    service.all_paths("Saruman", "Maiar").await.unwrap();

    let calls = oracle.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c.starts_with("exists:")));
}

#[tokio::test]
async fn given_redirect_source_when_single_path_then_redirect_query_only() {
    let (service, oracle) = recording_service();

    let edges = service.single_path("Mithrandir", "Maiar").await.unwrap();

    assert!(oracle.calls().contains(&"tree:REDIRECT".to_string()));
    assert!(!oracle.calls().iter().any(|c| c.ends_with(":PAGE") && !c.starts_with("exists:")));
    assert_eq!(
        titles(&edges),
        vec![
            ("Mithrandir".to_string(), "Gandalf".to_string()),
            ("Gandalf".to_string(), "Celebrimbor".to_string()),
            ("Celebrimbor".to_string(), "Maiar".to_string()),
        ]
    );
    assert_eq!(edges[0].source.kind(), NodeKind::Redirect);
}

#[tokio::test]
async fn given_single_path_when_flattened_then_one_start_and_one_end_tag() {
    let (service, _) = recording_service();

    let edges = service.single_path("Gandalf", "Valinor").await.unwrap();

    assert_eq!(edges.len(), 3);
    assert!(is_connected(&edges));
    assert_eq!(start_count(&edges), 1);
    assert_eq!(end_count(&edges), 1);
    assert!(edges[0].source.is_path_start());
    assert!(edges[2].target.is_path_end());
}

#[tokio::test]
async fn given_three_equal_paths_when_paging_then_skip_and_limit_count_paths() {
    let (service, _) = recording_service();

    let edges = service.paged_paths("Gandalf", "Maiar", 1, 1).await.unwrap();

    assert_eq!(
        titles(&edges),
        vec![
            ("Gandalf".to_string(), "Istari".to_string()),
            ("Istari".to_string(), "Maiar".to_string()),
        ]
    );
    assert_eq!(start_count(&edges), 1);
    assert_eq!(end_count(&edges), 1);
}

#[tokio::test]
async fn given_page_past_the_end_when_paging_then_empty() {
    let (service, _) = recording_service();

    let edges = service.paged_paths("Gandalf", "Maiar", 3, 5).await.unwrap();

    assert!(edges.is_empty());
}

#[tokio::test]
async fn given_negative_paging_when_paging_then_oracle_clamps() {
    let (service, _) = recording_service();

    let edges = service.paged_paths("Gandalf", "Maiar", -4, 2).await.unwrap();

    assert_eq!(edges.len(), 4);
    assert_eq!(edges[0].target.title(), "Celebrimbor");
}

#[tokio::test]
async fn given_all_paths_when_reconstructed_then_each_path_is_recovered() {
    let (service, _) = recording_service();

    let edges = service.all_paths("Gandalf", "Maiar").await.unwrap();
    assert_eq!(edges.len(), 6);
    assert_eq!(start_count(&edges), 3);
    assert_eq!(end_count(&edges), 3);

    let paths = reconstruct_paths(&edges);

    assert_eq!(paths.len(), 3);
    for path in &paths {
        assert!(is_connected(path));
        assert_eq!(path[0].source.title(), "Gandalf");
        assert_eq!(path[path.len() - 1].target.title(), "Maiar");
    }
}

/// Sampler answering a fixed pair of titles.
struct FixedSampler(Vec<String>);

#[async_trait]
impl PageSampler for FixedSampler {
    async fn random_page_titles(&self, n: usize) -> OracleResult<Vec<String>> {
        Ok(self.0.iter().take(n).cloned().collect())
    }
}

#[tokio::test]
async fn given_sampled_pair_when_random_path_then_same_edges_as_single_path() {
    testing::init_test_setup();
    let sampler = FixedSampler(vec!["Gandalf".to_string(), "Maiar".to_string()]);
    let service = PathService::new(middle_earth(), Arc::new(sampler));

    let random = service.random_path().await.unwrap();
    let single = service.single_path("Gandalf", "Maiar").await.unwrap();

    assert_eq!(random.len(), 2);
    assert_eq!(titles(&random), titles(&single));
    assert!(random[0].source.is_path_start());
    assert!(random[1].target.is_path_end());
}

/// Sampler that never has enough pages.
struct SinglePageSampler;

#[async_trait]
impl PageSampler for SinglePageSampler {
    async fn random_page_titles(&self, _n: usize) -> OracleResult<Vec<String>> {
        Ok(vec!["Gandalf".to_string()])
    }
}

#[tokio::test]
async fn given_too_few_sampled_pages_when_random_path_then_empty() {
    testing::init_test_setup();
    let service = PathService::new(middle_earth(), Arc::new(SinglePageSampler));

    assert!(service.random_path().await.unwrap().is_empty());
}
