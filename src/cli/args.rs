//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::Status;

/// Concept tree for math learning: layered topics, unlock progression and completion tracking
#[derive(Parser, Debug)]
#[command(name = "tapmath")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding the catalog documents (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draw the concept tree with status per concept
    Tree,

    /// List concepts
    List {
        /// Only this layer (roots, trunk, branches)
        #[arg(short, long)]
        layer: Option<String>,
        /// Only concepts with this status
        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,
    },

    /// Show concept details
    Show {
        /// Concept id
        id: String,
    },

    /// Mark concept as complete
    Complete {
        /// Concept id
        id: String,
    },

    /// Show completion per layer
    Progress,

    /// Show node positions for a layer
    Layout {
        /// Layer id
        layer: String,
        /// Number of nodes (default: concepts in the layer)
        #[arg(short, long)]
        count: Option<usize>,
        /// Use arc formulas instead of the slot table
        #[arg(long)]
        parametric: bool,
        /// Jitter seed for --parametric (default: configured seed)
        #[arg(long, requires = "parametric")]
        seed: Option<u64>,
    },

    /// Extract the video id from a share or watch URL
    Video {
        /// Video URL
        url: String,
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

/// Status filter for `list`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusArg {
    Completed,
    Available,
    Locked,
}

impl From<StatusArg> for Status {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Completed => Status::Completed,
            StatusArg::Available => Status::Available,
            StatusArg::Locked => Status::Locked,
        }
    }
}
