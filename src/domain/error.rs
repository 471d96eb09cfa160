//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors are graph consistency violations found while loading a
/// graph document. Path algorithms themselves never fail.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("title names more than one node: {0}")]
    DuplicateTitle(String),

    #[error("link references unknown node: {0}")]
    UnknownNode(String),

    #[error("invalid relation {source_id} -> {target_id}: {reason}")]
    InvalidRelation {
        source_id: String,
        target_id: String,
        reason: String,
    },
}
