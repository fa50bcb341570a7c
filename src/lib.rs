//! clip-history - clipboard history manager
//!
//! Records every text or image copied to the system clipboard into a
//! persisted, newest-first history that can be searched, re-copied and
//! pruned. Several processes may share one history store; each keeps its
//! in-memory view in step through the store's change notifications.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: History items and their identity rules, the history list,
//!   search/filter, configuration values and errors
//! - **Application**: The history store, the running session and port
//!   interfaces (traits)
//! - **Infrastructure**: Adapter implementations (arboard clipboard,
//!   polling watcher, JSON file store, XDG config)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
