//! Diagnostics setup
//!
//! Diagnostics go to stderr through `tracing`; user-facing output stays on
//! the [`Presenter`](super::presenter::Presenter).

use tracing_subscriber::EnvFilter;

/// Filter for our own crate at `level`, warnings for dependencies
pub fn filter_directives(level: &str, verbose: bool) -> String {
    let level = if verbose { "debug" } else { level };
    format!("warn,clip_history={}", level)
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level unless `verbose` is set.
pub fn init_logging(level: &str, verbose: bool) {
    let directives = filter_directives(level, verbose);
    let filter = if verbose {
        EnvFilter::new(directives)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
    };

    // Already initialized is fine (tests, repeated calls)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
