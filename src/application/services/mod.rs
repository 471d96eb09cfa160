//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on oracle boundary traits (GraphOracle, PageSampler)
//! but are themselves concrete structs, not traits.

mod path;
mod source_type;

pub use path::PathService;
pub use source_type::SourceTypeResolver;
