//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, signal handling,
//! diagnostics setup and the command runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod logging;
pub mod pid_file;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{run_clear, run_copy, run_delete, run_list, run_watch, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, ListArgs};
pub use presenter::Presenter;
