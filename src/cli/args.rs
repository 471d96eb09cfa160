//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Shortest paths between encyclopedia pages and redirects, as role-tagged edges
#[derive(Parser, Debug)]
#[command(name = "wikipath")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Explicit config file (TOML)
    #[arg(short = 'c', long = "config", global = true, value_hint = ValueHint::FilePath)]
    pub config_file: Option<PathBuf>,

    /// Graph document (JSON), overrides graph_file from config
    #[arg(short, long, global = true, env = "WIKIPATH_GRAPH_FILE", value_hint = ValueHint::FilePath)]
    pub graph: Option<PathBuf>,

    /// Hop ceiling, overrides max_hops from config
    #[arg(long, global = true)]
    pub max_hops: Option<u32>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Length of a shortest path (0 when none)
    Length {
        /// Source title
        source: String,
        /// Target title
        target: String,
    },

    /// One shortest path as edges
    Path {
        /// Source title
        source: String,
        /// Target title
        target: String,
    },

    /// Shortest path between two random pages
    Random,

    /// A page of shortest paths as edges
    Paths {
        /// Source title
        source: String,
        /// Target title
        target: String,
        /// Paths to skip
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        skip: i64,
        /// Paths to return (default: default_limit from config)
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },

    /// All shortest paths as edges
    All {
        /// Source title
        source: String,
        /// Target title
        target: String,
    },

    /// Kind of the node a title names
    SourceType {
        /// Node title
        title: String,
    },

    /// Rebuild distinct paths from an edge list (JSON array)
    Reconstruct {
        /// Edge list file, '-' for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Node and relation counts of the graph
    Stats,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Print a template config file
    Template,
}
