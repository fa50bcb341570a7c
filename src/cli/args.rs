//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// clip-history - clipboard history manager
#[derive(Parser, Debug)]
#[command(name = "clip-history")]
#[command(version)]
#[command(about = "Record, search and re-copy your clipboard history")]
#[command(long_about = None)]
pub struct Cli {
    /// History store file (overrides config and CLIP_HISTORY_STORE)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Print debug diagnostics to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record clipboard changes until interrupted
    Watch,
    /// Show history, newest first
    List(ListArgs),
    /// Put a history item back on the clipboard
    Copy {
        /// Item index as shown by `list`
        index: usize,
    },
    /// Delete a history item
    Delete {
        /// Item index as shown by `list`
        index: usize,
        /// Delete every entry with the same content, not just this one
        #[arg(long)]
        all: bool,
    },
    /// Delete all history
    Clear,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options for `list`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Case-insensitive search over content and copy time
    #[arg(short = 'q', long, value_name = "QUERY")]
    pub query: Option<String>,

    /// Hide text items
    #[arg(long)]
    pub no_text: bool,

    /// Hide image items
    #[arg(long)]
    pub no_images: bool,

    /// Show at most this many items
    #[arg(short = 'n', long, value_name = "LIMIT")]
    pub limit: Option<usize>,

    /// Print the matching items as JSON
    #[arg(long)]
    pub json: bool,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["max_items", "poll_interval_ms", "store_path", "log_level"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
