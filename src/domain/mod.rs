//! Domain layer: entities and path algorithms
//!
//! This layer is independent of external concerns (no I/O, no async, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod flatten;
pub mod projection;
pub mod reconstruct;

pub use arena::{NodeData, TreeArena, TreeNode};
pub use entities::*;
pub use error::DomainError;
pub use flatten::flatten;
pub use projection::{PageProjection, PathProjection, ProjectionRef, RedirectProjection};
pub use reconstruct::{is_connected, reconstruct_paths};
