//! Infrastructure layer: oracle implementations and DI container
//!
//! This layer implements the oracle boundary traits and wires up services.

pub mod di;
pub mod error;
pub mod memory;
pub mod traits;

pub use error::{InfraError, InfraResult};
