//! wikipath: shortest paths between encyclopedia pages and redirects
//!
//! Layers, innermost first:
//! - `domain`: path trees, flattening into tagged edges, path reconstruction
//! - `application`: path queries over a graph oracle
//! - `infrastructure`: oracle implementations, errors, service wiring
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
