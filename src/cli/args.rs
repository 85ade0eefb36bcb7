//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

/// CoRIx risk trees: aggregate assessment scores bottom-up and inspect them
#[derive(Parser, Debug)]
#[command(name = "corix")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Working directory holding .corix.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// CSV score table (overrides config)
    #[arg(short = 'f', long = "data", global = true, value_hint = ValueHint::FilePath)]
    pub data_file: Option<PathBuf>,

    /// TOML taxonomy file (overrides config)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub taxonomy: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Which application/scenario column to build.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Full column name, e.g. "Application A - Pathfinder"
    #[arg(short, long, conflicts_with_all = ["application", "scenario"])]
    pub selection: Option<String>,

    /// Application name (requires --scenario)
    #[arg(short, long, requires = "scenario")]
    pub application: Option<String>,

    /// Scenario name (requires --application)
    #[arg(long, requires = "application")]
    pub scenario: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the aggregated tree
    Tree {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Deepest level to show (2..=5, default from config)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(2..=5))]
        max_level: Option<u32>,
    },

    /// Show the details of one node
    Inspect {
        /// Node id (construct name)
        node: String,
        #[command(flatten)]
        selection: SelectionArgs,
        /// Read an exported JSON snapshot instead of building
        #[arg(long, value_hint = ValueHint::FilePath)]
        snapshot: Option<PathBuf>,
    },

    /// Export the tree as a JSON snapshot
    Export {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// List application/scenario columns
    Selections,

    /// Root score of every selection
    Summary,

    /// Write the bundled sample dataset
    Sample {
        /// Output file (default: configured data file)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

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
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
