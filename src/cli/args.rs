//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Capability spend explorer: build a capability hierarchy from flat spend records, drill down and filter leaves by value
#[derive(Parser, Debug)]
#[command(name = "captree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// JSON table to load, `-` reads stdin (default: from config)
    #[arg(short = 'f', long = "data", global = true, value_hint = ValueHint::FilePath)]
    pub data: Option<PathBuf>,

    /// Directory holding a local .captree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the capability hierarchy as tree
    Tree,

    /// Show a node and its path from the root
    Find {
        /// Node id as shown by `tree`
        node_id: String,
    },

    /// Show the legal value range
    Range {
        /// Node id; the range then covers leaves below this node only
        node_id: Option<String>,
    },

    /// List leaves under a node, optionally filtered by value
    Leaves {
        /// Node id of the selected branch
        node_id: Option<String>,

        /// Range bounds, e.g. `--filter 10 --filter 500` (normalized against the value domain)
        #[arg(long = "filter", num_args = 1.., allow_negative_numbers = true)]
        filter: Vec<f64>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show table statistics
    Info,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Show config file locations
    Path,
    /// Print a template config file
    Template,
}
